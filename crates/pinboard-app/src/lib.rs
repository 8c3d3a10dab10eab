//! Application operations for Pinboard.
//!
//! This crate composes the content store, link index, and validation gate
//! into the workflows the host process exposes to clients:
//!
//! - [`Board::new_card`] / [`Board::post_to_card`] — commit a post, publish
//!   it, and link it under its owning card
//! - [`Board::list_posts`] — posts attached to a card, in posting order
//! - [`Board::list_cards`] — everything registered under the board root
//! - [`Board::add_member`] — register a participant under the board root
//!
//! plus the lifecycle hooks the host invokes on join ([`Board::genesis`])
//! and on replication ([`Board::accept_entry`], [`Board::accept_link`]).
//!
//! The board root is the content-derived id of the application manifest
//! committed at initialization — configuration, not an ambient global.

pub mod board;
pub mod error;
pub mod model;

pub use board::Board;
pub use error::{AppError, AppResult};
pub use model::{
    Post, PostRules, CARD_POST_TAG, MANIFEST_ENTRY_TYPE, POST_ENTRY_TYPE, ROOT_REGISTRY_TAG,
};
