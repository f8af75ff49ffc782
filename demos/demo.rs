/* demos/demo.rs */

use best_ip::{HeaderMap, IpClassifier, IpExtractor, ProxyOrder, get_client_ip, get_ips_from_string};
use std::collections::HashMap;

fn main() {
    println!("=== Best IP Resolution Examples ===\n");

    // Example 1: Forwarded-for chain, client on the left
    example_1_forwarded_for();

    // Example 2: Client on the right
    example_2_right_most();

    // Example 3: Private and loopback candidates across headers
    example_3_precedence();

    // Example 4: Proxy count and trusted proxies
    example_4_proxy_policy();

    // Example 5: Malformed chains
    example_5_malformed();

    // Example 6: Injected lookup function
    example_6_lookup_fn();

    println!("=== All examples completed! ===");
}

fn meta(pairs: &[(&str, &str)]) -> HeaderMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect::<HashMap<_, _>>()
}

fn example_1_forwarded_for() {
    println!("Example 1: X-Forwarded-For with multiple IPs");

    let headers = meta(&[(
        "HTTP_X_FORWARDED_FOR",
        "177.139.233.139, 198.84.193.157, 198.84.193.158",
    )]);
    let best = IpExtractor::new().extract_map(&headers);
    println!("Resolved: {:?} (routable: {})", best.ip(), best.is_routable());
    println!();
}

fn example_2_right_most() {
    println!("Example 2: Client appended on the right by the edge proxy");

    let headers = meta(&[("HTTP_X_FORWARDED_FOR", "198.84.193.157, 177.139.233.139")]);
    let best = IpExtractor::new()
        .proxy_order(ProxyOrder::RightMost)
        .extract_map(&headers);
    println!("Resolved: {:?} (routable: {})", best.ip(), best.is_routable());
    println!();
}

fn example_3_precedence() {
    println!("Example 3: Private beats loopback, public beats both");

    let headers = meta(&[("HTTP_X_FORWARDED_FOR", "10.0.0.1"), ("REMOTE_ADDR", "127.0.0.1")]);
    let best = IpExtractor::new().extract_map(&headers);
    println!("Private + loopback: {:?} (routable: {})", best.ip(), best.is_routable());

    let headers = meta(&[
        ("HTTP_X_FORWARDED_FOR", "10.0.0.1"),
        ("HTTP_X_REAL_IP", "177.139.233.133"),
    ]);
    let best = IpExtractor::new().extract_map(&headers);
    println!("Private + public: {:?} (routable: {})", best.ip(), best.is_routable());
    println!();
}

fn example_4_proxy_policy() {
    println!("Example 4: Proxy count and trusted proxies");

    let headers = meta(&[(
        "HTTP_X_FORWARDED_FOR",
        "177.139.233.139, 198.84.193.157, 198.84.193.158",
    )]);

    let best = IpExtractor::new().proxy_count(2).extract_map(&headers);
    println!("Expecting two proxies: {:?}", best.ip());

    let best = IpExtractor::new().proxy_count(1).extract_map(&headers);
    println!("Expecting one proxy: {:?}", best.ip());

    let best = IpExtractor::new()
        .trusted_proxies(["198.84.193."])
        .extract_map(&headers);
    println!("Trusting 198.84.193.x: {:?}", best.ip());

    let strict =
        IpExtractor::new().with_classifier(IpClassifier::new().with_documentation_ranges());
    let best = strict.extract_map(&meta(&[("REMOTE_ADDR", "203.0.113.7")]));
    println!("Documentation range as private: {:?} (routable: {})", best.ip(), best.is_routable());
    println!();
}

fn example_5_malformed() {
    println!("Example 5: Malformed chains are discarded whole");

    for value in ["unknown, 177.139.233.139", "177.139.233.139, junk, 10.0.0.1"] {
        let chain = get_ips_from_string(value);
        println!("{value:?} -> {} candidate(s): {:?}", chain.len(), chain.as_slice());
    }
    println!();
}

fn example_6_lookup_fn() {
    println!("Example 6: Custom metadata lookup");

    let lookup = |key: &str| match key {
        "HTTP-X-REAL-IP" => Some("::ffff:177.139.233.139".to_string()),
        _ => None,
    };

    let best = get_client_ip(&lookup);
    println!("Resolved: {:?} (routable: {})", best.ip(), best.is_routable());
    println!();
}
