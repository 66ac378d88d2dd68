// ABOUTME: Command module aggregator for the cfkit CLI.
// ABOUTME: Re-exports login, listing, lifecycle, and push command handlers.

mod lifecycle;
mod listing;
mod login;
mod push;
mod session;

pub use lifecycle::{Lifecycle, lifecycle};
pub use listing::{apps, orgs, spaces};
pub use login::login;
pub use push::push;
