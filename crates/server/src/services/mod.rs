//! Application services.
//!
//! Services coordinate repositories, the media store, and crypto; route
//! handlers stay thin.

pub mod auth;
pub mod listings;
pub mod token;

pub use auth::{AuthError, AuthService};
pub use listings::{ListingChanges, ListingService, NewListing};
pub use token::{Claims, TokenError, TokenSigner};
