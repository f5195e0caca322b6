//! Conversation threading module
//!
//! This module reconstructs reply chains from a flat batch of chat messages.
//! Every message optionally points at the message it replies to; the builder
//! groups messages into maximal linear chains ("conversations") in a single
//! pass over the batch.
//!
//! ## Threading Strategy
//!
//! 1. **Newest first**: the batch is walked from its most recent message back,
//!    so each chain is entered at its leaf
//! 2. **Backward walk**: each unclaimed message starts a conversation and pulls
//!    in its reply-to predecessors until a reference is missing or already claimed
//! 3. **Oldest first out**: conversations are returned ordered by their last
//!    message
//!
//! Dangling references, reference cycles and reply fan-out all resolve to a
//! truncated chain. Threading never fails.
//!
//! ## Module Structure
//!
//! - `message`: Input records and the fetched batch
//! - `conversation`: Output chains and the ordered conversation set
//! - `chain_builder`: The single-pass threading algorithm

pub mod chain_builder;
pub mod conversation;
pub mod message;

// Re-export main types and functions
pub use chain_builder::{ThreadingStats, build_conversations, build_conversations_with_stats};
pub use conversation::{Conversation, ConversationSet};
pub use message::{Message, MessageBatch, MessageId, Reaction};
