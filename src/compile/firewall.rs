//! Firewall Script Compiler
//!
//! Renders the egress-lockdown shell script executed (with elevated
//! privilege) inside the container at first start. The script is idempotent
//! and strictly ordered: DNS forwarding state is snapshotted before any
//! flush, every allow rule is installed before the default policies flip to
//! deny, and the only fatal condition is an empty response from the GitHub
//! address-range endpoint. Per-item failures (a malformed CIDR, an
//! unresolvable domain, a duplicate ipset insertion) are tolerated so one bad
//! entry cannot block the whole policy.

use crate::policy::GenerationPolicy;

/// Compile the firewall script for the resolved policy.
///
/// Pure text production; the script's own network calls (HTTPS fetch, DNS
/// resolution) happen when it runs inside the container, not here.
pub fn compile(policy: &GenerationPolicy) -> String {
    let mut script = String::with_capacity(4096);

    script.push_str(PREAMBLE);
    script.push_str(SNAPSHOT_AND_RESET);
    script.push_str(BASELINE_ALLOWS);
    script.push_str(ALLOWLIST_SETUP);
    script.push_str(&domain_resolution_block(&policy.domains));
    script.push_str(HOST_NETWORK);
    script.push_str(DEFAULT_DENY);
    script.push('\n');

    script
}

const PREAMBLE: &str = r#"#!/bin/bash
set -euo pipefail
IFS=$'\n\t'
"#;

const SNAPSHOT_AND_RESET: &str = r#"
# Snapshot Docker's embedded-DNS NAT rules before touching any table so
# container name resolution survives the reset.
existing_dns_rules=$(iptables-save -t nat | grep "127\.0\.0\.11" || true)

# Flush filter and NAT state. A missing ipset is not an error.
iptables -F
iptables -X
iptables -t nat -F
iptables -t nat -X
ipset destroy allowed-domains 2>/dev/null || true

# Replay the snapshot, recreating any custom chains it references. The
# saved rule must be re-split into words; the strict IFS above only splits
# on newline and tab, so the replay goes through eval.
if [ -n "$existing_dns_rules" ]; then
    echo "$existing_dns_rules" | while IFS= read -r rule; do
        chain=$(echo "$rule" | awk '{print $2}')
        iptables -t nat -nL "$chain" >/dev/null 2>&1 || iptables -t nat -N "$chain"
        eval "iptables -t nat $rule"
    done
fi
"#;

const BASELINE_ALLOWS: &str = r#"
# Baseline allows, installed before any restriction: DNS, SSH, loopback.
iptables -A OUTPUT -p udp --dport 53 -j ACCEPT
iptables -A INPUT -p udp --sport 53 -j ACCEPT
iptables -A OUTPUT -p tcp --dport 22 -j ACCEPT
iptables -A INPUT -p tcp --sport 22 -m state --state ESTABLISHED -j ACCEPT
iptables -A INPUT -i lo -j ACCEPT
iptables -A OUTPUT -o lo -j ACCEPT
"#;

const ALLOWLIST_SETUP: &str = r#"
ipset create allowed-domains hash:net

# GitHub publishes its address ranges. An empty response would leave the
# allow-list incomplete, so that is fatal.
echo "Fetching GitHub IP ranges..."
gh_ranges=$(curl -s https://api.github.com/meta)
if [ -z "$gh_ranges" ]; then
    echo "ERROR: empty response from GitHub meta endpoint" >&2
    exit 1
fi

# Filter to well-formed IPv4 CIDRs first: the published lists also carry
# IPv6 ranges, which must not reach the aggregation step.
echo "$gh_ranges" | jq -r '(.web + .api + .git)[]' \
    | { grep -E '^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}/[0-9]{1,2}$' || true; } \
    | aggregate -q \
    | while IFS= read -r cidr; do
    ipset add allowed-domains "$cidr" 2>/dev/null || true
done
"#;

/// Render the per-domain resolution loop for the allow-list.
///
/// Resolution is best-effort: an unresolvable domain degrades reachability
/// for that one service instead of aborting setup.
fn domain_resolution_block(domains: &[&str]) -> String {
    let mut block = String::from("\n# Resolve the allowed domains into the ipset.\nfor domain in \\\n");
    for (i, domain) in domains.iter().enumerate() {
        if i + 1 == domains.len() {
            block.push_str(&format!("    \"{}\"; do\n", domain));
        } else {
            block.push_str(&format!("    \"{}\" \\\n", domain));
        }
    }
    block.push_str(
        r#"    echo "Resolving $domain..."
    ips=$(dig +short A "$domain" || true)
    if [ -z "$ips" ]; then
        echo "WARN: failed to resolve $domain" >&2
        continue
    fi
    echo "$ips" | while IFS= read -r ip; do
        if [[ ! "$ip" =~ ^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$ ]]; then
            echo "WARN: skipping non-IPv4 answer for $domain: $ip" >&2
            continue
        fi
        ipset add allowed-domains "$ip" 2>/dev/null || true
    done
done
"#,
    );
    block
}

const HOST_NETWORK: &str = r#"
# Host subnet from the default route's gateway: first three octets + .0/24.
host_ip=$(ip route | grep default | cut -d" " -f3 || true)
if [ -n "$host_ip" ]; then
    host_network=$(echo "$host_ip" | sed "s/\.[0-9]*$/.0\/24/")
    echo "Host network: $host_network"
    iptables -A INPUT -s "$host_network" -j ACCEPT
    iptables -A OUTPUT -d "$host_network" -j ACCEPT
else
    echo "WARN: no default route detected; skipping host network rules" >&2
fi
"#;

const DEFAULT_DENY: &str = r#"
# Every allow rule is in place; only now flip to default deny.
iptables -P INPUT DROP
iptables -P FORWARD DROP
iptables -P OUTPUT DROP

# Keep connections opened during setup alive under the new policy.
iptables -A INPUT -m state --state ESTABLISHED,RELATED -j ACCEPT
iptables -A OUTPUT -m state --state ESTABLISHED,RELATED -j ACCEPT

iptables -A OUTPUT -m set --match-set allowed-domains dst -j ACCEPT

echo "Firewall configured"
"#;
