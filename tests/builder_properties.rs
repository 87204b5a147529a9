//! Property tests for the text each primitive appends to the buffer

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use capfilter::filter::ExpressionBuilder;
use proptest::prelude::*;

fn any_direction() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "src", "dst"])
}

fn any_protocol() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["", "tcp", "udp"])
}

fn ip_addr() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<Ipv4Addr>().prop_map(IpAddr::V4),
        any::<Ipv6Addr>().prop_map(IpAddr::V6),
    ]
}

/// Words joined by single spaces, blanks dropped
fn words(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|w| !w.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

proptest! {
    #[test]
    fn host_appends_exact_text(ip in ip_addr(), direction in any_direction()) {
        let ip = ip.to_string();
        let mut builder = ExpressionBuilder::new();
        builder.host(&ip, direction).unwrap();

        prop_assert_eq!(builder.buffer(), words(&[direction, "host", &ip]));
        prop_assert!(builder.stack().is_empty());
    }

    #[test]
    fn host_appends_after_existing_text(ip in ip_addr(), direction in any_direction()) {
        let ip = ip.to_string();
        let mut builder = ExpressionBuilder::new();
        builder.port(22, "", "").unwrap().concate();
        builder.host(&ip, direction).unwrap();

        let expected = format!("port 22 and {}", words(&[direction, "host", &ip]));
        prop_assert_eq!(builder.buffer(), expected);
        prop_assert!(builder.stack().is_empty());
    }

    #[test]
    fn port_appends_exact_text(
        port in 0u16..=65535,
        direction in any_direction(),
        protocol in any_protocol(),
    ) {
        let mut builder = ExpressionBuilder::new();
        builder.port(port, direction, protocol).unwrap();

        let port = port.to_string();
        prop_assert_eq!(builder.buffer(), words(&[protocol, direction, "port", &port]));
        prop_assert!(builder.stack().is_empty());
    }

    #[test]
    fn port_given_as_string_matches_integer(port in 0u16..=65535) {
        let mut from_int = ExpressionBuilder::new();
        from_int.port(port, "", "").unwrap();
        let mut from_str = ExpressionBuilder::new();
        from_str.port(format!("{:05}", port), "", "").unwrap();

        prop_assert_eq!(from_int.buffer(), from_str.buffer());
    }

    #[test]
    fn port_above_range_is_rejected(port in 65536u32..=1_000_000) {
        let mut builder = ExpressionBuilder::new();
        prop_assert!(builder.port(port, "", "").is_err());
        prop_assert_eq!(builder.buffer(), "");
    }

    #[test]
    fn port_range_appends_bounds_in_given_order(
        a in 0u16..=65535,
        b in 0u16..=65535,
        direction in any_direction(),
        protocol in any_protocol(),
    ) {
        let mut builder = ExpressionBuilder::new();
        builder.port_range(a, b, direction, protocol).unwrap();

        let bounds = format!("{}-{}", a, b);
        prop_assert_eq!(builder.buffer(), words(&[protocol, direction, "portrange", &bounds]));
        prop_assert!(builder.stack().is_empty());
    }

    #[test]
    fn port_range_order_check_rejects_descending(a in 0u16..=65535, b in 0u16..=65535) {
        let mut builder = ExpressionBuilder::new();
        builder.check_range_order(true);
        let result = builder.port_range(a, b, "", "");

        prop_assert_eq!(result.is_ok(), a <= b);
    }

    #[test]
    fn serialize_is_repeatable(ip in ip_addr(), port in 0u16..=65535) {
        let mut builder = ExpressionBuilder::new();
        builder.host(&ip.to_string(), "").unwrap().concate().port(port, "", "").unwrap();
        builder.end().unwrap();

        let first = builder.serialize();
        prop_assert_eq!(&first, &builder.serialize());
        prop_assert_eq!(first, format!("host {} and port {}", ip, port));
    }
}
