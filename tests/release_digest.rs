use mail_review::threading::tree_traversal::path_to_root;
use mail_review::threading::{ReleaseToken, ThreadForest};
use mail_review::{Epoch, Message, MessageBatch, ReleaseDigest, ReviewConfig};

fn digest() -> ReleaseDigest {
    ReleaseDigest::from_config(&ReviewConfig {
        mailing_list: "list".into(),
        ..ReviewConfig::default()
    })
    .expect("valid default policy")
}

fn january(messages: Vec<Message>) -> Vec<MessageBatch> {
    vec![MessageBatch::new(Epoch::new(2020, 1), messages)]
}

fn announcement(id: &str, token: &str) -> Message {
    Message::new(id, format!("[list] New Tumbleweed snapshot {token} released!"))
}

#[test]
fn bare_reply_to_announcement_has_no_summary() {
    let export = digest().run(&january(vec![
        Message::new("<A@x>", "[list] New Tumbleweed snapshot 20200101 released!"),
        Message::new("<B@x>", "Re: [list] New Tumbleweed snapshot 20200101 released!")
            .in_reply_to("<A@x>"),
    ]));

    let release = export.get("20200101").expect("release exported");
    assert_eq!(release.announcement, "2020-01.0");
    assert_eq!(release.thread_count, 1);
    assert_eq!(release.reference_count, 1);
    assert_eq!(release.threads.len(), 1);
    assert_eq!(release.threads[0].topic, "no summary given");
    assert_eq!(release.threads[0].messages, vec!["2020-01.1"]);
}

#[test]
fn subject_mention_matches_release() {
    let export = digest().run(&january(vec![
        announcement("<A@x>", "20200101"),
        Message::new("<W@x>", "Wifi broken after updating to snapshot 20200101")
            .references(["<unknown@x>"]),
    ]));

    let release = export.get("20200101").unwrap();
    assert_eq!(release.thread_count, 1);
    assert_eq!(release.threads[0].topic, "Wifi broken");
    assert_eq!(release.threads[0].messages, vec!["2020-01.1"]);
}

#[test]
fn newest_mentioned_release_wins() {
    let export = digest().run(&january(vec![
        announcement("<A@x>", "20200101"),
        announcement("<B@x>", "20200201"),
        Message::new("<C@x>", "update 20200101 -> 20200201 plasma crashing"),
    ]));

    assert_eq!(export.get("20200101").unwrap().thread_count, 0);
    let newer = export.get("20200201").unwrap();
    assert_eq!(newer.thread_count, 1);
    assert_eq!(newer.threads[0].messages, vec!["2020-01.2"]);
}

#[test]
fn deepest_known_reference_is_parent() {
    let digest = digest();
    let archive = digest.thread(&january(vec![
        Message::new("<X@x>", "x"),
        Message::new("<Y@x>", "y"),
        Message::new("<M@x>", "m").references(["<X@x>", "<Y@x>", "<Z@x>"]),
    ]));

    let m = archive.find("<M@x>").unwrap();
    assert_eq!(archive.forest.parent(m), archive.find("<Y@x>"));
}

#[test]
fn cutover_switches_announcement_format() {
    let batches = vec![
        MessageBatch::new(
            Epoch::new(2020, 11),
            vec![
                announcement("<old@x>", "20201101"),
                Message::new("<early@x>", "New Tumbleweed snapshot 20201102 released!"),
            ],
        ),
        MessageBatch::new(
            Epoch::new(2020, 12),
            vec![
                Message::new("<new@x>", "New Tumbleweed snapshot 20201201 released!"),
                announcement("<stale@x>", "20201202"),
                Message::new("<reply@x>", "Re: New Tumbleweed snapshot 20201201 released!")
                    .in_reply_to("new@x"),
            ],
        ),
    ];

    let export = digest().run(&batches);
    let releases: Vec<&str> = export.releases().map(|(token, _)| token.as_str()).collect();
    assert_eq!(releases, vec!["20201101", "20201201"]);

    let december = export.get("20201201").unwrap();
    assert_eq!(december.announcement, "2020-12.0");
    assert_eq!(december.threads[0].topic, "no summary given");
}

#[test]
fn every_node_has_single_path_to_root() {
    let digest = digest();
    let archive = digest.thread(&january(vec![
        announcement("<A@x>", "20200101"),
        Message::new("<B@x>", "Re: boot").in_reply_to("<A@x>"),
        Message::new("<C@x>", "Re: boot").references(["<A@x>", "<B@x>"]),
        Message::new("<C@x>", "Re: boot again").in_reply_to("<C@x>"),
        Message::new("<D@x>", "loop").in_reply_to("<D@x>").references(["<D@x>"]),
    ]));

    for id in archive.forest.ids() {
        let path = path_to_root(&archive.forest, id).expect("no cycles");
        assert_eq!(path.last(), Some(&ThreadForest::ROOT));
    }
}

#[test]
fn reference_counts_are_conserved() {
    let export = digest().run(&january(vec![
        announcement("<A@x>", "20200101"),
        Message::new("<B@x>", "Re: [list] New Tumbleweed snapshot 20200101 released!")
            .in_reply_to("<A@x>"),
        Message::new("<C@x>", "Re: [list] New Tumbleweed snapshot 20200101 released!")
            .in_reply_to("<B@x>"),
        Message::new("<D@x>", "Re: grub").in_reply_to("<A@x>"),
        Message::new("<E@x>", "grub broken in 20200101"),
        Message::new("<F@x>", "Re: grub broken in 20200101").in_reply_to("<E@x>"),
    ]));

    let release = export.get("20200101").unwrap();
    let sum: usize = release.threads.iter().map(|t| t.reference_count).sum();
    assert_eq!(sum, release.reference_count);
    assert_eq!(release.reference_count, 5);

    let grub = release
        .threads
        .iter()
        .find(|t| t.topic == "grub broken")
        .expect("merged grub topic");
    assert_eq!(grub.messages.len(), 1);

    let total_grub: usize = release
        .threads
        .iter()
        .filter(|t| t.topic.starts_with("grub"))
        .map(|t| t.reference_count)
        .sum();
    assert_eq!(total_grub, 3);
}

#[test]
fn export_serializes_as_release_map() {
    let export = digest().run(&january(vec![announcement("<A@x>", "20200101")]));
    let json = serde_json::to_string(&export).unwrap();
    assert_eq!(
        json,
        r#"{"20200101":{"announcement":"2020-01.0","reference_count":0,"thread_count":0,"threads":[]}}"#
    );
    assert!(export.get(ReleaseToken::new("20200101").as_str()).is_some());
}

#[test]
fn announcement_replies_replace_earlier_mentions() {
    let export = digest().run(&january(vec![
        Message::new("<early@x>", "Ready for 20200101?"),
        announcement("<A@x>", "20200101"),
        Message::new("<B@x>", "Re: boot").in_reply_to("<A@x>"),
    ]));

    assert_eq!(
        export.to_string(),
        "20200101 <1 / 1>\n- boot <1 / 2020-01.2>\n"
    );
}
