use macresolve_domain::{MacAddress, NeighborEntry, NeighborState};
use std::net::IpAddr;

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

fn mac(s: &str) -> MacAddress {
    s.parse().unwrap()
}

#[test]
fn test_empty_entry_has_no_ip() {
    assert!(NeighborEntry::EMPTY.is_empty());
    assert!(NeighborEntry::default().is_empty());
    assert!(!NeighborEntry::new(ip("192.0.2.1"), None).is_empty());
}

#[test]
fn test_zero_mac_is_not_resolved() {
    let entry = NeighborEntry::new(ip("192.0.2.1"), Some(MacAddress::ZERO));
    assert_eq!(entry.resolved_mac(), None);

    let entry = NeighborEntry::new(ip("192.0.2.1"), None);
    assert_eq!(entry.resolved_mac(), None);

    let entry = NeighborEntry::new(ip("192.0.2.1"), Some(mac("aa:bb:cc:dd:ee:ff")));
    assert_eq!(entry.resolved_mac(), Some(mac("aa:bb:cc:dd:ee:ff")));
}

#[test]
fn test_full_equality_includes_state() {
    let a = NeighborEntry::new(ip("192.0.2.1"), Some(mac("aa:bb:cc:dd:ee:ff")))
        .with_state(NeighborState::Stale)
        .with_interface("eth0");
    let b = a.clone().with_state(NeighborState::Reachable);

    assert_ne!(a, b);
    assert!(a.eq_except_state(&b));
}

#[test]
fn test_except_state_equality_still_compares_other_fields() {
    let a = NeighborEntry::new(ip("192.0.2.1"), Some(mac("aa:bb:cc:dd:ee:ff")));

    assert!(!a.eq_except_state(&a.clone().with_permanent(true)));
    assert!(!a.eq_except_state(&a.clone().with_interface("eth1")));
    assert!(!a.eq_except_state(&NeighborEntry::new(ip("192.0.2.2"), a.mac)));
}

#[test]
fn test_authoritative_entries() {
    let base = NeighborEntry::new(ip("192.0.2.1"), Some(mac("aa:bb:cc:dd:ee:ff")));

    assert!(base.clone().with_permanent(true).is_authoritative());
    assert!(base.clone().with_state(NeighborState::Reachable).is_authoritative());
    assert!(!base.clone().with_state(NeighborState::Stale).is_authoritative());
    assert!(!base.with_state(NeighborState::Probe).is_authoritative());
}

#[test]
fn test_entry_serializes_mac_as_string() {
    let entry = NeighborEntry::new(ip("192.0.2.1"), Some(mac("AA:BB:CC:DD:EE:FF")))
        .with_state(NeighborState::Delay);
    let json = serde_json::to_value(&entry).unwrap();

    assert_eq!(json["mac"], "aa:bb:cc:dd:ee:ff");
    assert_eq!(json["state"], "delay");

    let back: NeighborEntry = serde_json::from_value(json).unwrap();
    assert_eq!(back, entry);
}
