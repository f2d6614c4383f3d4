//! Integration tests: HEAD probing against a local HTTP server.

mod common;

use common::file_server::{self, Route};
use linkgrab_core::config::HttpConfig;
use linkgrab_core::control::CancelToken;
use linkgrab_core::fetch_head::{probe, Prober};
use linkgrab_core::{Error, FetchError, Item};
use std::thread;
use std::time::{Duration, Instant};

fn item(name: &str, link: &str) -> Item {
    Item {
        name: name.to_string(),
        link: link.to_string(),
        extension: "pdf".to_string(),
    }
}

#[test]
fn reports_status_per_item_without_body() {
    let server = file_server::start(vec![("/ok.pdf", Route::ok(vec![7u8; 4321]))]);
    let items = vec![item("Ok.pdf", "ok.pdf"), item("Gone.pdf", "gone.pdf")];

    let results: Vec<_> = probe(&items, &server.base_url).collect();
    assert_eq!(results.len(), 2);
    let ok = results[0].as_ref().unwrap();
    assert_eq!((ok.index, ok.name.as_str(), ok.status), (0, "Ok.pdf", 200));
    assert_eq!(ok.content_length, Some(4321));
    assert!(ok.is_success());
    let gone = results[1].as_ref().unwrap();
    assert_eq!((gone.index, gone.status), (1, 404));
    assert!(!gone.is_success());

    assert_eq!(server.hits_with_method("HEAD"), 2);
    assert_eq!(server.hits_with_method("GET"), 0);
}

#[test]
fn transport_failure_does_not_stop_probing() {
    let server = file_server::start(vec![
        ("/a.pdf", Route::ok(b"a".to_vec())),
        ("/c.pdf", Route::ok(b"c".to_vec())),
    ]);
    let items = vec![
        item("A.pdf", &server.url("/a.pdf")),
        item("B.pdf", &file_server::dead_url("/b.pdf")),
        item("C.pdf", &server.url("/c.pdf")),
    ];

    let results: Vec<_> = probe(&items, "").collect();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().status, 200);
    match &results[1] {
        Err(Error::Probe { index, name, .. }) => {
            assert_eq!(*index, 1);
            assert_eq!(name, "B.pdf");
        }
        other => panic!("expected probe failure, got {other:?}"),
    }
    assert_eq!(results[2].as_ref().unwrap().status, 200);
}

#[test]
fn probing_is_lazy() {
    let server = file_server::start(vec![("/a.pdf", Route::ok(b"a".to_vec()))]);
    let items = vec![item("A.pdf", "/a.pdf"), item("A2.pdf", "/a.pdf")];

    let mut probes = probe(&items, &server.base_url);
    assert_eq!(server.total_hits(), 0);
    probes.next().unwrap().unwrap();
    assert_eq!(server.total_hits(), 1);
}

#[test]
fn cancel_stops_between_requests() {
    let server = file_server::start(vec![("/a.pdf", Route::ok(b"a".to_vec()))]);
    let items = vec![item("A.pdf", "/a.pdf"), item("B.pdf", "/a.pdf")];
    let cancel = CancelToken::new();
    let prober = Prober::new(server.base_url.clone(), HttpConfig::default()).with_cancel(cancel.clone());

    let mut probes = prober.probe(&items);
    assert!(probes.next().unwrap().is_ok());
    cancel.cancel();
    assert!(probes.next().is_none());
    assert_eq!(server.total_hits(), 1);
}

#[test]
fn cancel_aborts_head_in_flight() {
    let server = file_server::start(vec![(
        "/slow.pdf",
        Route::stalled(b"slow".to_vec(), Duration::from_secs(30)),
    )]);
    let items = vec![item("Slow.pdf", "/slow.pdf"), item("Next.pdf", "/slow.pdf")];
    let cancel = CancelToken::new();
    let prober = Prober::new(server.base_url.clone(), HttpConfig::default()).with_cancel(cancel.clone());

    let trigger = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            cancel.cancel();
        })
    };
    let started = Instant::now();
    let results: Vec<_> = prober.probe(&items).collect();
    trigger.join().unwrap();

    assert!(started.elapsed() < Duration::from_secs(15), "took {:?}", started.elapsed());
    assert!(results.is_empty(), "{results:?}");
    assert_eq!(server.hits_for("/slow.pdf"), 1);
}

#[test]
fn head_reports_cancelled_when_token_is_set() {
    let server = file_server::start(vec![(
        "/slow.pdf",
        Route::stalled(b"slow".to_vec(), Duration::from_secs(30)),
    )]);
    let cancel = CancelToken::new();
    let prober = Prober::new(server.base_url.clone(), HttpConfig::default()).with_cancel(cancel.clone());
    let trigger = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        cancel.cancel();
    });
    let err = prober.head(&server.url("/slow.pdf")).unwrap_err();
    trigger.join().unwrap();
    assert!(matches!(err, FetchError::Cancelled), "{err:?}");
}
