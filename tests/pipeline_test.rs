//! Batch pipeline tests with mock resolvers and probers.
//!
//! Covers:
//! - Output count and order under concurrency
//! - First-match candidate selection
//! - Deduplication across resolvers
//! - Unresolved domains and their comment lines
//! - Idempotence of the rendered output

use hostsync::base::neterror::NetError;
use hostsync::config::ResolverEndpoint;
use hostsync::dns::{Addrs, MultiResolver, Name, Resolve, ResolverSlot, Resolving};
use hostsync::hosts::{self, DomainEntry, OutputLine};
use hostsync::refresh::{BatchRunner, DomainResolver, RunSummary};
use hostsync::socket::{Probe, Probing};

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

/// Per-domain answers with an optional per-domain delay.
#[derive(Default)]
struct TableResolver {
    answers: HashMap<String, Vec<Ipv4Addr>>,
    delays: HashMap<String, Duration>,
}

impl TableResolver {
    fn with(mut self, domain: &str, addrs: &[&str]) -> Self {
        self.answers
            .insert(domain.to_string(), addrs.iter().map(|s| ip(s)).collect());
        self
    }

    fn delayed(mut self, domain: &str, delay: Duration) -> Self {
        self.delays.insert(domain.to_string(), delay);
        self
    }
}

impl Resolve for TableResolver {
    fn resolve(&self, name: Name) -> Resolving {
        let answer = self.answers.get(name.as_str()).cloned();
        let delay = self.delays.get(name.as_str()).copied().unwrap_or_default();
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            match answer {
                Some(addrs) => Ok(Box::new(addrs.into_iter()) as Addrs),
                None => Err(NetError::NameNotResolved),
            }
        })
    }
}

/// Reachability table that counts attempts per address.
#[derive(Default)]
struct CountingProber {
    reachable: HashSet<Ipv4Addr>,
    attempts: Mutex<HashMap<Ipv4Addr, usize>>,
    latency: HashMap<Ipv4Addr, Duration>,
}

impl CountingProber {
    fn reachable(addrs: &[&str]) -> Self {
        Self {
            reachable: addrs.iter().map(|s| ip(s)).collect(),
            ..Default::default()
        }
    }

    fn attempts(&self, addr: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(&ip(addr))
            .copied()
            .unwrap_or(0)
    }
}

impl Probe for CountingProber {
    fn probe(&self, addr: Ipv4Addr, _port: u16, _timeout: Duration) -> Probing {
        *self.attempts.lock().unwrap().entry(addr).or_default() += 1;
        let ok = self.reachable.contains(&addr);
        let latency = self.latency.get(&addr).copied().unwrap_or_default();
        Box::pin(async move {
            tokio::time::sleep(latency).await;
            ok
        })
    }
}

fn runner(
    resolvers: Vec<TableResolver>,
    prober: Arc<CountingProber>,
    concurrency: usize,
) -> BatchRunner {
    let slots = resolvers
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            ResolverSlot::new(
                ResolverEndpoint::from_ip(Ipv4Addr::new(10, 0, 0, i as u8 + 1)),
                Arc::new(r),
            )
        })
        .collect();
    let resolver = DomainResolver::new(
        MultiResolver::new(slots, Duration::from_secs(2)),
        prober,
        443,
        Duration::from_secs(3),
    );
    BatchRunner::new(Arc::new(resolver), concurrency)
}

fn entries(domains: &[&str]) -> Vec<DomainEntry> {
    domains.iter().map(|d| DomainEntry::new(*d)).collect()
}

#[tokio::test]
async fn test_output_matches_input_order_under_concurrency() {
    // Early domains answer slowest so completion order is reversed
    let table = TableResolver::default()
        .with("a.com", &["1.0.0.1"])
        .with("b.com", &["1.0.0.2"])
        .with("c.com", &["1.0.0.3"])
        .delayed("a.com", Duration::from_millis(150))
        .delayed("b.com", Duration::from_millis(75));
    let prober = Arc::new(CountingProber::reachable(&["1.0.0.1", "1.0.0.2", "1.0.0.3"]));

    let domains = entries(&["a.com", "b.com", "broken.invalid", "c.com"]);
    let lines = runner(vec![table], prober, 8).run(&domains).await;

    assert_eq!(lines.len(), domains.len());
    let order: Vec<_> = lines.iter().map(|l| l.domain().clone()).collect();
    assert_eq!(order, domains);
    assert_eq!(
        hosts::render(&lines),
        "1.0.0.1         a.com\n\
         1.0.0.2         b.com\n\
         # Failed to resolve: broken.invalid\n\
         1.0.0.3         c.com\n"
    );
}

#[tokio::test]
async fn test_sequential_mode_matches_concurrent_output() {
    let make = || {
        TableResolver::default()
            .with("a.com", &["1.0.0.1"])
            .with("b.com", &["1.0.0.2"])
            .delayed("a.com", Duration::from_millis(20))
    };
    let domains = entries(&["a.com", "b.com", "a.com"]);

    let sequential = runner(
        vec![make()],
        Arc::new(CountingProber::reachable(&["1.0.0.1", "1.0.0.2"])),
        1,
    )
    .run(&domains)
    .await;
    let concurrent = runner(
        vec![make()],
        Arc::new(CountingProber::reachable(&["1.0.0.1", "1.0.0.2"])),
        16,
    )
    .run(&domains)
    .await;

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_duplicate_domains_processed_independently() {
    let table = TableResolver::default().with("a.com", &["1.0.0.1"]);
    let prober = Arc::new(CountingProber::reachable(&["1.0.0.1"]));

    let lines = runner(vec![table], prober.clone(), 4)
        .run(&entries(&["a.com", "a.com"]))
        .await;

    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(OutputLine::is_resolved));
    assert_eq!(prober.attempts("1.0.0.1"), 2);
}

#[tokio::test]
async fn test_second_candidate_wins_when_first_unreachable() {
    let table = TableResolver::default().with("example.com", &["10.1.1.1", "10.2.2.2"]);
    let prober = Arc::new(CountingProber {
        reachable: [ip("10.2.2.2")].into_iter().collect(),
        // The working candidate is slower; first-match still picks it
        latency: [(ip("10.2.2.2"), Duration::from_millis(50))].into_iter().collect(),
        ..Default::default()
    });

    let lines = runner(vec![table], prober.clone(), 1)
        .run(&entries(&["example.com"]))
        .await;

    assert_eq!(lines[0].to_string(), "10.2.2.2        example.com");
    assert_eq!(prober.attempts("10.1.1.1"), 1);
    assert_eq!(prober.attempts("10.2.2.2"), 1);
}

#[tokio::test]
async fn test_higher_priority_resolver_probed_first() {
    let primary = TableResolver::default().with("example.com", &["1.1.1.1"]);
    let secondary = TableResolver::default().with("example.com", &["2.2.2.2"]);
    let prober = Arc::new(CountingProber::reachable(&["1.1.1.1", "2.2.2.2"]));

    let lines = runner(vec![primary, secondary], prober.clone(), 1)
        .run(&entries(&["example.com"]))
        .await;

    assert_eq!(lines[0].to_string(), "1.1.1.1         example.com");
    // Stopped at the first success
    assert_eq!(prober.attempts("2.2.2.2"), 0);
}

#[tokio::test]
async fn test_shared_candidate_probed_once() {
    let first = TableResolver::default().with("example.com", &["1.2.3.4"]);
    let second = TableResolver::default().with("example.com", &["1.2.3.4", "5.6.7.8"]);
    let prober = Arc::new(CountingProber::default());

    let lines = runner(vec![first, second], prober.clone(), 1)
        .run(&entries(&["example.com"]))
        .await;

    assert_eq!(lines[0].to_string(), "# Failed to resolve: example.com");
    assert_eq!(prober.attempts("1.2.3.4"), 1);
    assert_eq!(prober.attempts("5.6.7.8"), 1);
}

#[tokio::test]
async fn test_no_records_from_any_resolver() {
    let prober = Arc::new(CountingProber::default());
    let lines = runner(
        vec![TableResolver::default(), TableResolver::default()],
        prober,
        2,
    )
    .run(&entries(&["broken.invalid"]))
    .await;

    assert_eq!(
        lines,
        vec![OutputLine::Failed {
            domain: DomainEntry::new("broken.invalid")
        }]
    );
    assert_eq!(lines[0].to_string(), "# Failed to resolve: broken.invalid");
}

#[tokio::test]
async fn test_example_line_format() {
    let table = TableResolver::default().with("example.com", &["93.184.216.34"]);
    let prober = Arc::new(CountingProber::reachable(&["93.184.216.34"]));

    let domains = hosts::parse("93.184.216.34 example.com\n");
    let lines = runner(vec![table], prober, 1).run(&domains).await;

    assert_eq!(lines[0].to_string(), "93.184.216.34   example.com");
}

#[tokio::test]
async fn test_idempotent_output() {
    let make_runner = || {
        let table = TableResolver::default()
            .with("a.com", &["1.0.0.1", "1.0.0.9"])
            .with("b.com", &["2.0.0.1"])
            .delayed("b.com", Duration::from_millis(10));
        runner(
            vec![table],
            Arc::new(CountingProber::reachable(&["1.0.0.9", "2.0.0.1"])),
            4,
        )
    };
    let domains = entries(&["a.com", "b.com", "c.com"]);

    let first = hosts::render(&make_runner().run(&domains).await);
    let second = hosts::render(&make_runner().run(&domains).await);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_run_summary() {
    let table = TableResolver::default()
        .with("a.com", &["1.0.0.1"])
        .with("b.com", &["1.0.0.2"]);
    let prober = Arc::new(CountingProber::reachable(&["1.0.0.1"]));

    let lines = runner(vec![table], prober, 2)
        .run(&entries(&["a.com", "b.com", "c.com"]))
        .await;

    assert_eq!(
        RunSummary::from_lines(&lines),
        RunSummary {
            total: 3,
            resolved: 1,
            unresolved: 2
        }
    );
}

#[tokio::test]
async fn test_empty_domain_list() {
    let lines = runner(vec![TableResolver::default()], Arc::new(CountingProber::default()), 4)
        .run(&[])
        .await;
    assert!(lines.is_empty());
}
