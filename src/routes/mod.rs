/// Router Module Index
///
/// Routes are split by who may reach them. Protection is applied once, by the
/// route guard layered over the whole router in `create_router`, and again by
/// the `Session` extractor every dashboard handler takes.

/// The public site: pages, contact wizard, JSON search and health.
pub mod public;

/// Sign-in, sign-up and sign-out.
pub mod auth;

/// The authenticated administration area under `/dashboard`.
pub mod dashboard;
