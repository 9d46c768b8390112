use domains::Identity;

/// `Hello <name>` for the first display value the identity has.
pub fn greet(identity: &Identity) -> Option<String> {
    identity.display_name().map(|name| format!("Hello {name}"))
}
