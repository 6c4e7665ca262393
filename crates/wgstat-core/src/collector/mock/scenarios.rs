//! Pre-built `wg` outputs for testing.
//!
//! Both fixtures describe the same two interfaces (`home` and `remote`),
//! each with one peer.

use super::runner::MockRunner;

/// `wg show all dump` output.
pub const DUMP_TWO_INTERFACES: &str = "\
home\tyAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk=\tp3p3Uzj50FS7sdrTEviJwlsFaUu1TUdBsp+VZUdzm1I=\t12345\t0xca6c
home\tJO2If0/wZ8ajoiUSU501u6uNtDZYSIYiz/xtazIMDi0=\tFpCyhws9cxwWoV4xELtfJvjJN+zQVRPISllRWgeopVE=\t198.51.100.1:54321\t192.168.2.0/24, 192.168.1.0/24\t1586448211\t76697\t100485\toff
remote\tGI6EdUSJvrwzAe9fLKjmGTTHJ1fHxLLnH2zA8oP1TVc=\tdwOgn4nnq8Zg23BOIolGSipNCKLz8Cf7aj2g3jPmX1E=\t34567\t0xca6c
remote\tWMwr/+0L4HJS4rsyM5oUlOUP+jTyp2HIuYPWfUNjC0c=\t(none)\t203.0.113.100:443\t0.0.0.0/0, ::/0\t1586448097\t23398\t49746\t25
";

/// Private and preshared keys appearing in [`DUMP_TWO_INTERFACES`].
pub const DUMP_PRIVATE_KEYS: [&str; 3] = [
    "yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk=",
    "FpCyhws9cxwWoV4xELtfJvjJN+zQVRPISllRWgeopVE=",
    "GI6EdUSJvrwzAe9fLKjmGTTHJ1fHxLLnH2zA8oP1TVc=",
];

/// `wg show` output.
pub const LEGACY_TWO_INTERFACES: &str = "\
interface: home
  public key: p3p3Uzj50FS7sdrTEviJwlsFaUu1TUdBsp+VZUdzm1I=
  private key: (hidden)
  listening port: 12345
  fwmark: 0xca6c

peer: JO2If0/wZ8ajoiUSU501u6uNtDZYSIYiz/xtazIMDi0=
  endpoint: 198.51.100.1:54321
  allowed ips: 192.168.2.0/24, 192.168.1.0/24
  latest handshake: 21 seconds ago
  transfer: 74.90 KiB received, 98.13 KiB sent

interface: remote
  public key: dwOgn4nnq8Zg23BOIolGSipNCKLz8Cf7aj2g3jPmX1E=
  private key: (hidden)
  listening port: 34567
  fwmark: 0xca6c

peer: WMwr/+0L4HJS4rsyM5oUlOUP+jTyp2HIuYPWfUNjC0c=
  endpoint: 203.0.113.100:443
  allowed ips: 0.0.0.0/0, ::/0
  latest handshake: 1 minute, 54 seconds ago
  transfer: 22.85 KiB received, 48.58 KiB sent
";

impl MockRunner {
    /// Dump output for two interfaces with one peer each.
    pub fn two_interfaces() -> Self {
        Self::with_output(DUMP_TWO_INTERFACES)
    }

    /// Legacy output for two interfaces with one peer each.
    pub fn two_interfaces_legacy() -> Self {
        Self::with_output(LEGACY_TWO_INTERFACES)
    }

    /// Dump output where the first peer has a corrupt counter and a stray
    /// three-column line precedes the second interface.
    pub fn with_damaged_lines() -> Self {
        Self::with_output(
            "\
wg0\tcHJpdmF0ZTA=\tpub0\t51820\toff
wg0\tpeerA\t(none)\t10.0.0.1:51820\t10.1.0.0/16\t1700000000\tNaN\t300\toff
wg0\tpeerB\t(none)\t10.0.0.2:51820\t10.2.0.0/16\t1700000050\t400\t500\t25
junk\tline\there
wg1\tcHJpdmF0ZTE=\tpub1\t51821\toff
wg1\tpeerC\t(none)\t(none)\t10.3.0.0/16\t0\t0\t0\toff
",
        )
    }

    /// A host without any WireGuard interface.
    pub fn no_interfaces() -> Self {
        Self::with_output(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_fixture_shape() {
        let lines: Vec<&str> = DUMP_TWO_INTERFACES.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split('\t').count(), 5);
        assert_eq!(lines[1].split('\t').count(), 9);
        assert_eq!(lines[2].split('\t').count(), 5);
        assert_eq!(lines[3].split('\t').count(), 9);
    }

    #[test]
    fn test_private_keys_appear_in_fixture() {
        for key in DUMP_PRIVATE_KEYS {
            assert!(DUMP_TWO_INTERFACES.contains(key));
        }
    }
}
