use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use repasse_core::coordinator::{Applied, Coordinator, ResultView};
use repasse_core::error::{CoreError, ValidationError};
use repasse_core::history::HistoryCache;
use repasse_core::model::{Candidate, LookupRequest, LookupResult};
use repasse_core::render::ResultCard;
use repasse_core::service::MunicipalityService;
use repasse_core::session::SearchSettings;

/// In-process stand-in for the HTTP service that records every call.
#[derive(Default)]
struct FakeService {
    searches: Mutex<Vec<String>>,
    lookups: Mutex<Vec<serde_json::Value>>,
    fail_lookup: bool,
}

#[async_trait]
impl MunicipalityService for FakeService {
    async fn search(&self, term: &str) -> Result<Vec<Candidate>, CoreError> {
        self.searches.lock().unwrap().push(term.to_string());
        let all = [
            Candidate::new(123, "Springfield", "IL"),
            Candidate::new(456, "Springfield", "MO"),
            Candidate::new(789, "Shelbyville", "IL"),
        ];
        Ok(all
            .into_iter()
            .filter(|c| c.name.to_lowercase().starts_with(&term.to_lowercase()))
            .collect())
    }

    async fn lookup(&self, request: &LookupRequest) -> Result<LookupResult, CoreError> {
        self.lookups
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        if self.fail_lookup {
            return Err(CoreError::Network("connection refused".to_string()));
        }
        Ok(LookupResult {
            entity_label: format!("{} - {}", request.name(), request.region()),
            period_label: format!("{} até {}", request.start(), request.end()),
            fpm: 1_500_000.25,
            royalties: 32_000.0,
            todos: 2_000_000.0,
        })
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Feed `text` one character at a time, `gap` apart, firing any due search.
async fn type_text(
    c: &mut Coordinator,
    service: &FakeService,
    text: &str,
    start: Instant,
    gap: Duration,
) -> Instant {
    let mut now = start;
    for (i, ch) in text.char_indices() {
        now = start + gap * i as u32;
        c.text_changed(&text[..i + ch.len_utf8()], now);
        if let Some(ticket) = c.poll_search(now) {
            let outcome = service.search(&ticket.term).await;
            c.apply_suggestions(ticket.token, outcome);
        }
    }
    now
}

#[tokio::test]
async fn test_springfield_end_to_end() {
    let service = FakeService::default();
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));

    let t0 = Instant::now();
    let last = type_text(&mut c, &service, "Springfield", t0, ms(30)).await;
    assert!(service.searches.lock().unwrap().is_empty());

    let ticket = c.poll_search(last + ms(250)).expect("debounce should fire");
    let outcome = service.search(&ticket.term).await;
    assert_eq!(c.apply_suggestions(ticket.token, outcome), Applied::Shown(2));
    assert_eq!(*service.searches.lock().unwrap(), vec!["Springfield"]);

    let picked = c.select(0).cloned().unwrap();
    assert_eq!(picked, Candidate::new(123, "Springfield", "IL"));
    assert!(!c.suggestions().is_open());

    let request = c.begin_submit("2023-01-01", "2023-12-31").unwrap().unwrap();
    let outcome = service.lookup(&request).await;
    c.finish_submit(outcome);

    assert_eq!(
        service.lookups.lock().unwrap()[0],
        serde_json::json!({
            "codigo": 123,
            "nome": "Springfield",
            "uf": "IL",
            "data_inicio": "01.01.2023",
            "data_fim": "31.12.2023"
        })
    );
    assert!(matches!(c.display(), ResultView::Result(_)));
    assert_eq!(c.history().len(), 1);
    assert!(!c.is_submitting());
}

#[tokio::test]
async fn test_short_terms_issue_no_calls() {
    let service = FakeService::default();
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));

    let t0 = Instant::now();
    for text in ["", "S", " S ", "é"] {
        c.text_changed(text, t0);
        assert!(c.poll_search(t0 + ms(10_000)).is_none());
        assert!(!c.suggestions().is_open());
    }
    assert!(service.searches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_out_of_order_responses_keep_latest() {
    let service = FakeService::default();
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));
    let t0 = Instant::now();

    c.text_changed("Sh", t0);
    let older = c.poll_search(t0 + ms(250)).unwrap();
    c.text_changed("Sp", t0 + ms(300));
    let newer = c.poll_search(t0 + ms(550)).unwrap();

    let older_call = service.search(&older.term);
    let newer_call = service.search(&newer.term);

    // Newer resolves first, older arrives late
    let newer_outcome = newer_call.await;
    let older_outcome = older_call.await;
    assert_eq!(c.apply_suggestions(newer.token, newer_outcome), Applied::Shown(2));
    assert_eq!(c.apply_suggestions(older.token, older_outcome), Applied::Stale);
    assert!(c.suggestions().items().iter().all(|s| s.name == "Springfield"));

    // Same calls, resolved in issue order
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));
    c.text_changed("Sh", t0);
    let older = c.poll_search(t0 + ms(250)).unwrap();
    c.text_changed("Sp", t0 + ms(300));
    let newer = c.poll_search(t0 + ms(550)).unwrap();
    let older_outcome = service.search(&older.term).await;
    let newer_outcome = service.search(&newer.term).await;
    assert_eq!(c.apply_suggestions(older.token, older_outcome), Applied::Stale);
    assert_eq!(c.apply_suggestions(newer.token, newer_outcome), Applied::Shown(2));
}

#[tokio::test]
async fn test_submit_after_edit_issues_no_lookup() {
    let service = FakeService::default();
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));
    let t0 = Instant::now();

    c.text_changed("Shelby", t0);
    let ticket = c.poll_search(t0 + ms(250)).unwrap();
    let outcome = service.search(&ticket.term).await;
    c.apply_suggestions(ticket.token, outcome);
    c.select(0).unwrap();

    c.text_changed("Shelbyville - I", t0 + ms(1000));
    let result = c.begin_submit("2023-01-01", "2023-12-31");
    assert_eq!(result, Err(ValidationError::NoSelection));
    assert!(!c.is_submitting());
    assert!(service.lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_failure_reenables_submit() {
    let service = FakeService {
        fail_lookup: true,
        ..Default::default()
    };
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::in_memory(25));
    let t0 = Instant::now();
    c.text_changed("Spring", t0);
    let ticket = c.poll_search(t0 + ms(250)).unwrap();
    let outcome = service.search(&ticket.term).await;
    c.apply_suggestions(ticket.token, outcome);
    c.select(1).unwrap();

    let request = c.begin_submit("2024-01-01", "2024-01-31").unwrap().unwrap();
    assert!(c.is_submitting());
    let outcome = service.lookup(&request).await;
    c.finish_submit(outcome);

    assert!(matches!(c.display(), ResultView::Failed(_)));
    assert!(!c.is_submitting());
    assert!(c.history().is_empty());
}

#[tokio::test]
async fn test_history_survives_restart_and_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("historico.json");
    let service = FakeService::default();

    let fresh_card = {
        let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::load(&path, 25));
        let t0 = Instant::now();
        c.text_changed("Springfield", t0);
        let ticket = c.poll_search(t0 + ms(250)).unwrap();
        let outcome = service.search(&ticket.term).await;
        c.apply_suggestions(ticket.token, outcome);
        c.select(0).unwrap();
        let request = c.begin_submit("2023-01-01", "2023-12-31").unwrap().unwrap();
        let outcome = service.lookup(&request).await;
        c.finish_submit(outcome);
        c.displayed_card().unwrap()
    };

    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::load(&path, 25));
    assert_eq!(c.history().len(), 1);
    let lookups_before = service.lookups.lock().unwrap().len();

    let replayed = c.replay(0).cloned().unwrap();
    assert_eq!(ResultCard::from(&replayed), fresh_card);
    assert_eq!(c.displayed_card().unwrap(), fresh_card);
    assert_eq!(service.lookups.lock().unwrap().len(), lookups_before);
    assert!(c.selection().is_none());
}

#[tokio::test]
async fn test_history_keeps_most_recent_capacity_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("historico.json");
    let service = FakeService::default();
    let mut c = Coordinator::new(SearchSettings::default(), HistoryCache::load(&path, 25));

    let t0 = Instant::now();
    c.text_changed("Springfield", t0);
    let ticket = c.poll_search(t0 + ms(250)).unwrap();
    let outcome = service.search(&ticket.term).await;
    c.apply_suggestions(ticket.token, outcome);
    c.select(0).unwrap();

    for day in 1..=30 {
        let date = format!("2023-01-{:02}", day);
        let request = c.begin_submit(&date, &date).unwrap().unwrap();
        let outcome = service.lookup(&request).await;
        c.finish_submit(outcome);
    }

    let history = c.history().all();
    assert_eq!(history.len(), 25);
    assert_eq!(history[0].period_label, "30.01.2023 até 30.01.2023");
    assert_eq!(history[24].period_label, "06.01.2023 até 06.01.2023");

    let reloaded = HistoryCache::load(&path, 25);
    assert_eq!(reloaded.all(), history);
}
