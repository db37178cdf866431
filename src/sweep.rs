// sweep.rs — the triage loop: fetch page → classify each message → trash
// promos → advance until the continuation token runs out.
//
// Every failure is local. A failed listing ends the sweep instead of
// retrying (the next run re-scans whatever is still unread); a failed
// message fetch or parse skips just that message; a failed trash leaves
// the message for a future sweep. Nothing in here aborts the process.

use crate::classify::Classifier;
use crate::gmail::{Mailbox, MessagePage};
use crate::message::ParsedMessage;

#[derive(Debug, Default)]
pub struct SweepStats {
    pub pages: u64,
    pub seen: u64,
    pub trashed: u64,
    pub skipped: u64,
}

pub fn run_sweep(mailbox: &dyn Mailbox, classifier: &Classifier) -> SweepStats {
    let mut stats = SweepStats::default();
    let mut page_token: Option<String> = None;

    loop {
        let page = match mailbox.list_unread(page_token.as_deref()) {
            Ok(page) => page,
            Err(e) => {
                log::debug!("failed to list unread messages, ending sweep: {e:?}");
                MessagePage::default()
            }
        };
        stats.pages += 1;
        log::debug!(
            "fetched page {} ({} messages), {} trashed so far",
            stats.pages,
            page.ids.len(),
            stats.trashed
        );

        for id in &page.ids {
            stats.seen += 1;
            process_message(mailbox, classifier, id, &mut stats);
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    stats
}

fn process_message(mailbox: &dyn Mailbox, classifier: &Classifier, id: &str, stats: &mut SweepStats) {
    let raw = match mailbox.get_message(id) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("failed to fetch message {id}, skipping: {e:?}");
            stats.skipped += 1;
            return;
        }
    };

    let msg = match ParsedMessage::from_raw(&raw) {
        Ok(msg) => msg,
        Err(e) => {
            // Cannot attribute it, so never delete it.
            log::debug!("failed to parse message {id}, skipping: {e:?}");
            stats.skipped += 1;
            return;
        }
    };

    let verdict = classifier.assess(&msg);
    if verdict.should_trash() {
        log::info!("{} is promotional", msg.subject);
        match mailbox.trash_message(id) {
            Ok(()) => {
                stats.trashed += 1;
                log::debug!("message {id} moved to trash");
            }
            Err(e) => log::debug!("failed to trash message {id}, leaving unread: {e:?}"),
        }
    }
    // Non-promotional messages stay unread on purpose: clearing the UNREAD
    // label here would stop a later sweep from reconsidering them.
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLog;
    use crate::classify::{Backend, BackendKind, BackendReply};
    use crate::gmail::{Header, Part, PartBody, Payload, RawMessage};
    use anyhow::bail;
    use base64::Engine;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    struct StubMailbox {
        pages: RefCell<Vec<MessagePage>>,
        messages: HashMap<String, RawMessage>,
        fail_get: HashSet<String>,
        fail_list: bool,
        trashed: RefCell<Vec<String>>,
    }

    impl StubMailbox {
        fn new(pages: Vec<MessagePage>) -> Self {
            Self {
                pages: RefCell::new(pages),
                messages: HashMap::new(),
                fail_get: HashSet::new(),
                fail_list: false,
                trashed: RefCell::new(Vec::new()),
            }
        }
    }

    impl Mailbox for StubMailbox {
        fn list_unread(&self, _page_token: Option<&str>) -> anyhow::Result<MessagePage> {
            if self.fail_list {
                bail!("503 backend unavailable");
            }
            let mut pages = self.pages.borrow_mut();
            if pages.is_empty() {
                Ok(MessagePage::default())
            } else {
                Ok(pages.remove(0))
            }
        }

        fn get_message(&self, id: &str) -> anyhow::Result<RawMessage> {
            if self.fail_get.contains(id) {
                bail!("404 message not found");
            }
            match self.messages.get(id) {
                Some(raw) => Ok(clone_raw(raw)),
                None => bail!("no such message {id}"),
            }
        }

        fn trash_message(&self, id: &str) -> anyhow::Result<()> {
            self.trashed.borrow_mut().push(id.to_string());
            Ok(())
        }
    }

    // RawMessage is a wire type without Clone; the stub rebuilds it.
    fn clone_raw(raw: &RawMessage) -> RawMessage {
        RawMessage {
            label_ids: raw.label_ids.clone(),
            payload: Payload {
                headers: raw
                    .payload
                    .headers
                    .iter()
                    .map(|h| Header { name: h.name.clone(), value: h.value.clone() })
                    .collect(),
                parts: raw
                    .payload
                    .parts
                    .iter()
                    .map(|p| Part {
                        mime_type: p.mime_type.clone(),
                        body: PartBody { data: p.body.data.clone() },
                    })
                    .collect(),
            },
        }
    }

    fn raw_message(subject: &str, body: &str, labels: &[&str]) -> RawMessage {
        RawMessage {
            label_ids: labels.iter().map(|s| s.to_string()).collect(),
            payload: Payload {
                headers: vec![
                    Header { name: "Subject".to_string(), value: subject.to_string() },
                    Header { name: "To".to_string(), value: "ada@example.com".to_string() },
                    Header { name: "From".to_string(), value: "sender@example.com".to_string() },
                ],
                parts: vec![Part {
                    mime_type: "text/plain".to_string(),
                    body: PartBody {
                        data: Some(base64::engine::general_purpose::URL_SAFE.encode(body)),
                    },
                }],
            },
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> MessagePage {
        MessagePage {
            ids: ids.iter().map(|s| s.to_string()).collect(),
            next_page_token: next.map(|s| s.to_string()),
        }
    }

    /// Backend that answers with a canned reply per subject substring.
    struct ScriptedBackend {
        kind: BackendKind,
        script: Vec<(&'static str, &'static str)>,
    }

    impl Backend for ScriptedBackend {
        fn kind(&self) -> BackendKind {
            self.kind
        }

        fn classify(&self, _system: &str, user_prompt: &str) -> anyhow::Result<BackendReply> {
            for (needle, answer) in &self.script {
                if user_prompt.contains(needle) {
                    return Ok(BackendReply { text: answer.to_string(), output_tokens: 5 });
                }
            }
            bail!("no scripted reply matched");
        }

        fn count_input_tokens(&self, _system: &str, _user: &str) -> Option<u32> {
            Some(100)
        }
    }

    struct UnusedBackend;

    impl Backend for UnusedBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::Local
        }

        fn classify(&self, _system: &str, _user: &str) -> anyhow::Result<BackendReply> {
            panic!("local backend must not be called in these scenarios");
        }
    }

    fn classifier(script: Vec<(&'static str, &'static str)>, dir: &std::path::Path) -> Classifier {
        Classifier::new(
            "policy".to_string(),
            Box::new(ScriptedBackend { kind: BackendKind::Hosted, script }),
            Box::new(UnusedBackend),
            AuditLog::new(dir.to_path_buf()).unwrap(),
        )
    }

    #[test]
    fn test_important_label_override_never_trashes() {
        // Promotional-looking body, but the policy makes the model answer
        // False for IMPORTANT mail; the loop must honor that.
        let mut mailbox = StubMailbox::new(vec![page(&["m1"], None)]);
        mailbox.messages.insert(
            "m1".to_string(),
            raw_message("Huge discounts inside", "50% off everything, buy now", &["UNREAD", "IMPORTANT"]),
        );
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(vec![("Huge discounts", "<answer>False</answer>")], dir.path());

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.seen, 1);
        assert_eq!(stats.trashed, 0);
        assert!(mailbox.trashed.borrow().is_empty());
    }

    #[test]
    fn test_one_page_promo_trashed_personal_kept() {
        let mut mailbox = StubMailbox::new(vec![page(&["promo", "personal"], None)]);
        mailbox
            .messages
            .insert("promo".to_string(), raw_message("Mega sale", "everything must go", &["UNREAD"]));
        mailbox
            .messages
            .insert("personal".to_string(), raw_message("Dinner?", "are you free tonight", &["UNREAD"]));
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(
            vec![
                ("Mega sale", "<answer>True</answer>"),
                ("Dinner?", "<answer>False</answer>"),
            ],
            dir.path(),
        );

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.seen, 2);
        assert_eq!(stats.trashed, 1);
        assert_eq!(*mailbox.trashed.borrow(), vec!["promo".to_string()]);
    }

    #[test]
    fn test_detail_fetch_failure_skips_and_continues() {
        let mut mailbox = StubMailbox::new(vec![page(&["broken", "ok"], None)]);
        mailbox.fail_get.insert("broken".to_string());
        mailbox
            .messages
            .insert("ok".to_string(), raw_message("Mega sale", "buy buy buy", &["UNREAD"]));
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(vec![("Mega sale", "<answer>True</answer>")], dir.path());

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.seen, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(*mailbox.trashed.borrow(), vec!["ok".to_string()]);
    }

    #[test]
    fn test_unparseable_message_never_classified_or_trashed() {
        let mut mailbox = StubMailbox::new(vec![page(&["headerless"], None)]);
        mailbox.messages.insert(
            "headerless".to_string(),
            RawMessage { label_ids: vec!["UNREAD".to_string()], payload: Payload::default() },
        );
        let dir = tempfile::tempdir().unwrap();
        // Empty script: any classify call would fail the run via Inconclusive,
        // but the point is that it is never reached.
        let classifier = classifier(vec![], dir.path());

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.skipped, 1);
        assert!(mailbox.trashed.borrow().is_empty());
    }

    #[test]
    fn test_multi_page_advances_with_token() {
        let mut mailbox = StubMailbox::new(vec![
            page(&["p1"], Some("tok")),
            page(&["p2"], None),
        ]);
        mailbox.messages.insert("p1".to_string(), raw_message("Sale A", "promo", &["UNREAD"]));
        mailbox.messages.insert("p2".to_string(), raw_message("Sale B", "promo", &["UNREAD"]));
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(
            vec![("Sale A", "<answer>True</answer>"), ("Sale B", "<answer>True</answer>")],
            dir.path(),
        );

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.pages, 2);
        assert_eq!(stats.trashed, 2);
    }

    #[test]
    fn test_list_failure_ends_sweep_quietly() {
        let mut mailbox = StubMailbox::new(vec![]);
        mailbox.fail_list = true;
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(vec![], dir.path());

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.pages, 1);
        assert_eq!(stats.seen, 0);
        assert!(mailbox.trashed.borrow().is_empty());
    }

    #[test]
    fn test_rerun_on_emptied_mailbox_is_idempotent() {
        // Previously-promotional messages are already trashed, so they no
        // longer show up as unread; a re-run must trash nothing.
        let mailbox = StubMailbox::new(vec![page(&[], None)]);
        let dir = tempfile::tempdir().unwrap();
        let classifier = classifier(vec![], dir.path());

        let stats = run_sweep(&mailbox, &classifier);

        assert_eq!(stats.trashed, 0);
        assert!(mailbox.trashed.borrow().is_empty());
    }
}
