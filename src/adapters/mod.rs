// Adapters layer: concrete implementations for external systems. The hours
// and booking sources live here; the token cache sits in core because its
// caching policy is engine logic, not wire plumbing.

pub mod http;
