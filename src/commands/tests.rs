use super::connect::CONNECT_FAILED;
use super::start::ADMIN_NEEDED;
use super::status::NOT_CONNECTED;
use super::*;
use crate::test_support::{message, MockChannel};
use linkwatch_core::message::{ChatInfo, ChatKind, IncomingMessage, MemberInfo};
use linkwatch_tracker::LinkCategory;

async fn run(
    cmd: Command,
    channel: &MockChannel,
    registry: &Mutex<Registry>,
    incoming: &IncomingMessage,
) -> String {
    let tracker = TrackerConfig::default();
    let ctx = CommandContext {
        channel,
        registry,
        tracker: &tracker,
        incoming,
        bot_name: "linkwatch",
    };
    handle(cmd, &ctx).await
}

fn admin(status: &str, can_post_messages: Option<bool>) -> MemberInfo {
    MemberInfo {
        status: status.to_string(),
        can_post_messages,
    }
}

const ME: Option<&str> = Some("linkwatch_bot");

#[test]
fn test_parse_all_commands() {
    assert_eq!(Command::parse("/start", ME), Some(Command::Start));
    assert_eq!(Command::parse("/help", ME), Some(Command::Help));
    assert_eq!(Command::parse("/connect", ME), Some(Command::Connect));
    assert_eq!(Command::parse("/status", None), Some(Command::Status));
}

#[test]
fn test_parse_commands_with_own_botname() {
    assert_eq!(Command::parse("/status@linkwatch_bot", ME), Some(Command::Status));
    assert_eq!(Command::parse("/status@LinkWatch_Bot", ME), Some(Command::Status));
    assert_eq!(
        Command::parse("/connect@linkwatch_bot now", ME),
        Some(Command::Connect)
    );
}

#[test]
fn test_parse_ignores_commands_for_other_bots() {
    assert_eq!(Command::parse("/connect@some_other_bot", ME), None);
    assert_eq!(Command::parse("/status@linkwatch_bot2", ME), None);
    // Our own name unknown: a mention cannot be confirmed.
    assert_eq!(Command::parse("/status@linkwatch_bot", None), None);

    assert!(for_other_bot("/connect@some_other_bot", ME));
    assert!(!for_other_bot("/connect@LINKWATCH_BOT", ME));
    assert!(!for_other_bot("/connect", ME));
    assert!(!for_other_bot("mail me@example.com", ME));
}

#[test]
fn test_parse_rejects_plain_and_unknown() {
    assert_eq!(Command::parse("hello /status", ME), None);
    assert_eq!(Command::parse("/statusx", ME), None);
    assert_eq!(Command::parse("/unknown", ME), None);
    assert_eq!(Command::parse("", ME), None);
    assert_eq!(Command::parse("   ", ME), None);
}

#[tokio::test]
async fn test_start_private_shows_usage() {
    let channel = MockChannel::default();
    let registry = Mutex::new(Registry::new());
    let msg = message(1, 1, ChatKind::Private, "/start");
    let reply = run(Command::Start, &channel, &registry, &msg).await;
    assert!(reply.contains("linkwatch"));
    assert!(reply.contains("/connect"));
    assert!(reply.contains("/help"));
}

#[tokio::test]
async fn test_start_group_as_admin() {
    let channel = MockChannel {
        member: Some(admin("administrator", None)),
        ..Default::default()
    };
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 1, ChatKind::Supergroup, "/start");
    let reply = run(Command::Start, &channel, &registry, &msg).await;
    assert!(reply.contains("Send /connect"));
}

#[tokio::test]
async fn test_start_group_not_admin() {
    let channel = MockChannel {
        member: Some(admin("member", None)),
        ..Default::default()
    };
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 1, ChatKind::Group, "/start");
    assert_eq!(run(Command::Start, &channel, &registry, &msg).await, ADMIN_NEEDED);
}

#[tokio::test]
async fn test_start_channel_admin_needs_post_right() {
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 1, ChatKind::Channel, "/start");

    let channel = MockChannel {
        member: Some(admin("administrator", Some(false))),
        ..Default::default()
    };
    assert_eq!(run(Command::Start, &channel, &registry, &msg).await, ADMIN_NEEDED);

    let channel = MockChannel {
        member: Some(admin("administrator", Some(true))),
        ..Default::default()
    };
    assert!(run(Command::Start, &channel, &registry, &msg)
        .await
        .contains("Send /connect"));
}

#[tokio::test]
async fn test_start_membership_error_asks_for_admin() {
    let channel = MockChannel {
        member_fails: true,
        ..Default::default()
    };
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 1, ChatKind::Supergroup, "/start");
    assert_eq!(run(Command::Start, &channel, &registry, &msg).await, ADMIN_NEEDED);
}

#[tokio::test]
async fn test_help_lists_commands() {
    let channel = MockChannel::default();
    let registry = Mutex::new(Registry::new());
    let msg = message(1, 1, ChatKind::Private, "/help");
    let reply = run(Command::Help, &channel, &registry, &msg).await;
    for cmd in ["/start", "/help", "/connect", "/status"] {
        assert!(reply.contains(cmd), "help should mention {cmd}");
    }
}

#[tokio::test]
async fn test_status_not_connected_creates_nothing() {
    let channel = MockChannel::default();
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 1, ChatKind::Supergroup, "/status");
    assert_eq!(run(Command::Status, &channel, &registry, &msg).await, NOT_CONNECTED);
    assert!(registry.lock().await.is_empty());
}

#[tokio::test]
async fn test_connect_captures_metadata_and_backfills() {
    let mut channel = MockChannel::with_chat(ChatInfo {
        kind: ChatKind::Supergroup,
        title: Some("Alpha".into()),
        description: Some("Home: https://alpha.xyz".into()),
        username: Some("alphachat".into()),
        photo_file_id: Some("file-big".into()),
        ..Default::default()
    });
    channel.file_path = Some("photos/file_3.jpg".into());
    channel.pinned = Some("Rules first".into());
    channel.username = Some("linkwatch_bot".into());
    channel.backlog = vec![
        message(-100, 3, ChatKind::Supergroup, "/status"),
        message(-100, 4, ChatKind::Supergroup, "/connect@other_bot https://t.me/other"),
        message(-100, 5, ChatKind::Supergroup, "chart https://dexscreener.com/abc"),
        message(-100, 6, ChatKind::Supergroup, "/price https://x.com/alpha"),
        message(-100, 11, ChatKind::Supergroup, "after connect https://t.me/late"),
        message(-200, 6, ChatKind::Supergroup, "other chat https://t.me/other"),
    ];

    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 10, ChatKind::Supergroup, "/connect");
    let reply = run(Command::Connect, &channel, &registry, &msg).await;
    assert!(reply.starts_with("Connected to Alpha."));
    assert!(reply.contains("Backfilled 2 message(s), 2 link(s) tracked."));

    let registry = registry.lock().await;
    let ledger = registry.get(-100).unwrap();
    assert_eq!(ledger.message_count, 2);
    assert!(ledger.links[&LinkCategory::Chart].contains("https://dexscreener.com/abc"));
    assert!(ledger.links[&LinkCategory::Twitter].contains("https://x.com/alpha"));
    assert!(!ledger.links.contains_key(&LinkCategory::Telegram));

    let meta = &ledger.metadata;
    assert_eq!(meta.title.as_deref(), Some("Alpha"));
    assert_eq!(meta.photo_reference.as_deref(), Some("photos/file_3.jpg"));
    assert_eq!(meta.pinned_message_text.as_deref(), Some("Rules first"));
    assert_eq!(meta.resolved_website.as_deref(), Some("https://alpha.xyz"));
    assert_eq!(
        meta.resolved_social_handles[&LinkCategory::Telegram],
        "https://t.me/alphachat"
    );
    assert!(!registry.is_registered(-200));
}

#[tokio::test]
async fn test_connect_photo_without_path_keeps_file_id() {
    let channel = MockChannel::with_chat(ChatInfo {
        photo_file_id: Some("file-big".into()),
        ..Default::default()
    });
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 10, ChatKind::Supergroup, "/connect");
    run(Command::Connect, &channel, &registry, &msg).await;
    let registry = registry.lock().await;
    assert_eq!(
        registry.get(-100).unwrap().metadata.photo_reference.as_deref(),
        Some("file-big")
    );
}

#[tokio::test]
async fn test_connect_fetch_failure_does_not_register() {
    let channel = MockChannel::default();
    let registry = Mutex::new(Registry::new());
    let msg = message(-100, 10, ChatKind::Supergroup, "/connect");
    assert_eq!(run(Command::Connect, &channel, &registry, &msg).await, CONNECT_FAILED);
    assert!(!registry.lock().await.is_registered(-100));
}

#[tokio::test]
async fn test_connect_then_status_report() {
    let channel = MockChannel::with_chat(ChatInfo {
        title: Some("Alpha".into()),
        ..Default::default()
    });
    let registry = Mutex::new(Registry::new());
    let connect_msg = message(100, 1, ChatKind::Channel, "/connect");
    run(Command::Connect, &channel, &registry, &connect_msg).await;

    {
        let mut reg = registry.lock().await;
        reg.record_message(
            100,
            "Check our chart at https://dexscreener.com/abc and join https://t.me/projectchat",
            chrono::Utc::now(),
        );
        reg.record_message(100, "Huge announcement coming!", chrono::Utc::now());
    }

    let status_msg = message(100, 4, ChatKind::Channel, "/status");
    let reply = run(Command::Status, &channel, &registry, &status_msg).await;
    assert!(reply.starts_with("Status for Alpha"));
    assert!(reply.contains("Messages tracked: 2"));
    assert!(reply.contains("Updates: 1"));
    assert!(reply.contains("Links: 2"));
    assert!(reply.contains("Telegram: https://t.me/projectchat"));
    assert!(reply.contains("Chart: https://dexscreener.com/abc"));
    assert!(reply.contains("- Huge announcement coming!..."));
}
