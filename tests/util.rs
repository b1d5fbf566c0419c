use visual_verdict::util::{route_slug, sha256_hex};

#[test]
fn slug_replaces_every_non_alnum() {
    assert_eq!(route_slug("/"), "_");
    assert_eq!(route_slug("/products/blue-shirt?v=1"), "_products_blue_shirt_v_1");
    assert_eq!(route_slug(""), "index");
}

#[test]
fn sha256_is_hex() {
    let h = sha256_hex(b"abc");
    assert_eq!(h.len(), 64);
    assert!(h.starts_with("ba7816bf"));
}
