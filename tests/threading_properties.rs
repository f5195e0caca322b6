use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use conversation_exporter::threading::{
    ConversationSet, Message, MessageBatch, build_conversations, build_conversations_with_stats,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
}

/// 200 messages mixing roots, replies, fan-out, dangling references and cycles
fn mixed_messages() -> Vec<Message> {
    (0..200u32)
        .map(|i| {
            let message = Message::new(
                u64::from(i),
                format!("{}", i % 5),
                format!("user{}", i % 5),
                base_time() + Duration::seconds(i64::from(i)),
                format!("message {}", i),
            );
            match i % 6 {
                0 => message,
                1 | 2 => message.replying_to(u64::from(i - 1)),
                3 => message.replying_to(u64::from(i - 3)), // fan-out onto a root
                4 => message.replying_to(10_000 + u64::from(i)), // outside the batch
                _ => message.replying_to(u64::from(i + 1)), // forward reference
            }
        })
        .chain([
            // Two-node cycle
            Message::new("x", "9", "x", base_time(), "x").replying_to("y"),
            Message::new("y", "9", "y", base_time() + Duration::seconds(1), "y").replying_to("x"),
        ])
        .collect()
}

fn all_ids(messages: &[Message]) -> HashSet<String> {
    messages.iter().map(|m| m.id.to_string()).collect()
}

fn assert_partition(conversations: &ConversationSet, expected: &HashSet<String>) {
    let mut seen = HashSet::new();
    for conversation in conversations {
        for message in conversation.messages() {
            assert!(
                seen.insert(message.id.to_string()),
                "message {} appears twice",
                message.id
            );
        }
    }
    assert_eq!(&seen, expected);
}

fn assert_chains_valid(conversations: &ConversationSet) {
    for conversation in conversations {
        assert!(!conversation.is_empty());
        for pair in conversation.messages().windows(2) {
            assert_eq!(pair[1].reply_to_id.as_ref(), Some(&pair[0].id));
        }
        let last = &conversation.messages()[conversation.len() - 1];
        assert_eq!(conversation.conversation_id(), &last.id);
    }
}

#[test]
fn every_message_lands_in_exactly_one_conversation() {
    let messages = mixed_messages();
    let expected = all_ids(&messages);

    let conversations = build_conversations(messages.into());

    assert_partition(&conversations, &expected);
    assert_chains_valid(&conversations);
}

#[test]
fn threading_is_deterministic_across_arrival_orders() {
    let messages = mixed_messages();
    let mut reversed = messages.clone();
    reversed.reverse();

    let first = build_conversations(messages.clone().into());
    let second = build_conversations(messages.into());
    let from_reversed = build_conversations(reversed.into());

    assert_eq!(first, second);
    assert_eq!(first, from_reversed);
}

#[test]
fn conversations_are_ordered_by_last_message() {
    let conversations = build_conversations(mixed_messages().into());

    let last_times: Vec<DateTime<Utc>> = conversations
        .iter()
        .map(|c| c.messages()[c.len() - 1].created_at)
        .collect();

    assert!(last_times.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn cycle_terminates_with_single_truncated_conversation() {
    let batch: MessageBatch = vec![
        Message::new("A", "1", "a", base_time(), "first").replying_to("B"),
        Message::new("B", "2", "b", base_time() + Duration::seconds(5), "second").replying_to("A"),
    ]
    .into();

    let (conversations, stats) = build_conversations_with_stats(batch);

    assert_eq!(conversations.len(), 1);
    let conversation = conversations.iter().next().unwrap();
    let ids: Vec<&str> = conversation.messages().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    // The root still points into its own chain; that reference is the cut
    assert_eq!(conversation.root().reply_to_id.as_ref().map(|id| id.as_str()), Some("B"));
    assert_eq!(stats.claimed_references, 1);
}

#[test]
fn dangling_reference_starts_own_conversation() {
    let batch: MessageBatch = vec![
        Message::new("1", "1", "A", base_time(), "hi"),
        Message::new("2", "2", "B", base_time() + Duration::seconds(1), "hey").replying_to("99"),
    ]
    .into();

    let conversations = build_conversations(batch);

    let ids: Vec<Vec<&str>> = conversations
        .iter()
        .map(|c| c.messages().iter().map(|m| m.id.as_str()).collect())
        .collect();
    assert_eq!(ids, vec![vec!["1"], vec!["2"]]);
}

#[test]
fn long_chain_is_rebuilt_root_first() {
    let messages: Vec<Message> = (0..5_000u64)
        .map(|i| {
            let message = Message::new(
                i,
                "1",
                "a",
                base_time() + Duration::seconds(i as i64),
                "x",
            );
            if i == 0 { message } else { message.replying_to(i - 1) }
        })
        .collect();

    let conversations = build_conversations(messages.into());

    assert_eq!(conversations.len(), 1);
    let conversation = conversations.iter().next().unwrap();
    assert_eq!(conversation.len(), 5_000);
    assert_eq!(conversation.root().id.as_str(), "0");
    assert_eq!(conversation.conversation_id().as_str(), "4999");
}

#[test]
fn empty_batch_yields_empty_set() {
    let conversations = build_conversations(MessageBatch::new());

    assert!(conversations.is_empty());
    assert_eq!(conversations.message_count(), 0);
}
