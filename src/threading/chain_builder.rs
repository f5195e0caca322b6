//! Single-pass reply-chain reconstruction
//!
//! ## Algorithm Overview
//!
//! 1. **Order the walk**: newest message first (`created_at` descending, ties
//!    broken by message id descending), so every chain is entered at its leaf
//! 2. **Claim starter**: an unclaimed message opens a new conversation
//! 3. **Walk backward**: follow `reply_to_id`, prepending and claiming each
//!    predecessor until the reference is missing or already claimed
//! 4. **Emit**: conversations are returned oldest first, i.e. in reverse
//!    discovery order
//!
//! Each message is claimed exactly once, so the pass is O(n) after the sort
//! and the result is a partition of the batch. A reference cycle is cut at
//! the first node that is already claimed. When several messages reply to the
//! same parent, the newest reply keeps it and the others become chains of
//! their own.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::threading::conversation::{Conversation, ConversationSet};
use crate::threading::message::{Message, MessageBatch, MessageId};

/// Counters collected while threading a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadingStats {
    /// Number of messages consumed
    pub messages: usize,

    /// Number of conversations emitted
    pub conversations: usize,

    /// Walks that stopped at a reference outside the batch
    pub dangling_references: usize,

    /// Walks that stopped at a message another conversation already owns
    pub claimed_references: usize,
}

/// Build conversations from a fetched batch
///
/// This is the main entry point for threading. The batch is consumed; its
/// messages move into the returned conversations.
///
/// ## Ordering
///
/// Conversations are ordered by their last message, oldest first. The walk
/// order depends only on message timestamps and ids, never on the order the
/// batch was filled in, so threading the same messages always gives the same
/// result.
pub fn build_conversations(batch: MessageBatch) -> ConversationSet {
    build_conversations_with_stats(batch).0
}

/// Build conversations and report what the walk ran into
pub fn build_conversations_with_stats(batch: MessageBatch) -> (ConversationSet, ThreadingStats) {
    let (_, mut unclaimed) = batch.into_parts();
    let walk_order = newest_first(&unclaimed);

    let mut claimed: HashSet<MessageId> = HashSet::with_capacity(walk_order.len());
    let mut stats = ThreadingStats {
        messages: walk_order.len(),
        ..ThreadingStats::default()
    };
    let mut conversations = Vec::new();

    for message_id in walk_order {
        // Already pulled into a newer chain as a predecessor
        let Some(starter) = unclaimed.remove(&message_id) else {
            continue;
        };
        claimed.insert(message_id);

        let chain = walk_reply_chain(starter, &mut unclaimed, &mut claimed, &mut stats);
        conversations.push(Conversation::from_chain(chain));
    }

    conversations.reverse();
    stats.conversations = conversations.len();

    log::debug!(
        "threaded {} messages into {} conversations ({} dangling, {} already claimed)",
        stats.messages,
        stats.conversations,
        stats.dangling_references,
        stats.claimed_references
    );

    (ConversationSet::new(conversations), stats)
}

/// Message ids sorted newest first
///
/// Ids only break timestamp ties; the comparison is on their text and implies
/// nothing about the platform's own id ordering.
fn newest_first(messages: &HashMap<MessageId, Message>) -> Vec<MessageId> {
    let mut keyed: Vec<(&Message, &MessageId)> = messages.iter().map(|(id, m)| (m, id)).collect();
    keyed.sort_by(|(a, a_id), (b, b_id)| compare_newest_first(a, a_id, b, b_id));
    keyed.into_iter().map(|(_, id)| id.clone()).collect()
}

fn compare_newest_first(a: &Message, a_id: &MessageId, b: &Message, b_id: &MessageId) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b_id.as_str().cmp(a_id.as_str()))
}

/// Follow reply references backward from a starter message
///
/// Returns the chain root first. Every predecessor taken out of `unclaimed`
/// is recorded in `claimed`, so a reference back into this chain (a cycle) or
/// into an earlier chain stops the walk.
///
/// ## Example
///
/// ```text
/// Batch: A ← B ← C   (C replies to B, B replies to A)
///
/// Starting from C:  [C] → [B, C] → [A, B, C]
/// ```
fn walk_reply_chain(
    starter: Message,
    unclaimed: &mut HashMap<MessageId, Message>,
    claimed: &mut HashSet<MessageId>,
    stats: &mut ThreadingStats,
) -> Vec<Message> {
    let mut next_reference = starter.reply_to_id.clone();
    let mut chain = VecDeque::from([starter]);

    while let Some(parent_id) = next_reference {
        match unclaimed.remove(&parent_id) {
            Some(parent) => {
                next_reference = parent.reply_to_id.clone();
                claimed.insert(parent_id);
                chain.push_front(parent);
            }
            None => {
                if claimed.contains(&parent_id) {
                    stats.claimed_references += 1;
                } else {
                    stats.dangling_references += 1;
                }
                break;
            }
        }
    }

    Vec::from(chain)
}
