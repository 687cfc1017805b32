//! Windowed similarity search and the search command.
//!
//! The paginator drives `/api/search` with an offset/count window: pages are
//! 1-based, each request asks for exactly `window_size` items at offset
//! `(page - 1) * window_size`, and a returned page shorter than the window is
//! the terminal-page signal. Results are ephemeral current-page state,
//! replaced wholesale on every fetch.

use anyhow::Result;
use std::io::Write;

use crate::api::{ApiClient, ChatRequest, SearchRequest};
use crate::chat;
use crate::config::Config;
use crate::models::{SearchHit, SummaryState};
use crate::owner;

/// Characters of document text shown per result outside of `v`.
const EXCERPT_CHARS: usize = 240;

/// Current-page state for windowed retrieval.
///
/// A search in flight holds the exclusive borrow, so a second call cannot
/// overlap it and race on shared result state. Page and results are applied
/// together once the response arrives.
pub struct Paginator {
    window_size: usize,
    centroids: Option<u32>,
    page: usize,
    query: String,
    category: String,
    results: Option<Vec<SearchHit>>,
}

impl Paginator {
    pub fn new(window_size: usize, centroids: Option<u32>) -> Self {
        Self {
            window_size,
            centroids,
            page: 1,
            query: String::new(),
            category: String::new(),
            results: None,
        }
    }

    /// 1-based current page.
    pub fn page(&self) -> usize {
        self.page
    }

    /// `None` means unsearched; `Some` holds the current page, possibly empty.
    pub fn results(&self) -> Option<&[SearchHit]> {
        self.results.as_deref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Forward navigation stays enabled only while pages come back full.
    pub fn has_next(&self) -> bool {
        matches!(&self.results, Some(hits) if hits.len() == self.window_size)
    }

    /// Switching category without re-searching clears the display to the
    /// unsearched state instead of showing stale results for the old one.
    pub fn set_category(&mut self, category: &str) {
        if category != self.category {
            self.category = category.to_string();
            self.query.clear();
            self.page = 1;
            self.results = None;
        }
    }

    /// Issues a search for the given page (clamped to >= 1, so the offset is
    /// never below 0). A new query or category discards the prior result set
    /// before the request goes out.
    pub async fn search(
        &mut self,
        api: &ApiClient,
        owner: &str,
        query: &str,
        category: &str,
        page: usize,
    ) {
        if query != self.query || category != self.category {
            self.results = None;
        }
        self.query = query.to_string();
        self.category = category.to_string();
        self.fetch(api, owner, page.max(1)).await;
    }

    /// Always issuable; callers gate on [`has_next`](Self::has_next).
    pub async fn next(&mut self, api: &ApiClient, owner: &str) {
        let page = self.page + 1;
        self.fetch(api, owner, page).await;
    }

    /// Silent no-op on page 1: the boundary is guarded, not an error.
    pub async fn previous(&mut self, api: &ApiClient, owner: &str) {
        if self.page <= 1 {
            return;
        }
        let page = self.page - 1;
        self.fetch(api, owner, page).await;
    }

    /// Drops one hit from the displayed page (after a document deletion).
    pub fn remove_hit(&mut self, document_id: u64) {
        if let Some(hits) = &mut self.results {
            hits.retain(|hit| hit.document_id != document_id);
        }
    }

    async fn fetch(&mut self, api: &ApiClient, owner: &str, page: usize) {
        let request = SearchRequest {
            owner: owner.to_string(),
            category: self.category.clone(),
            prefix: Some(self.category.clone()),
            text: self.query.trim().to_string(),
            count: self.window_size,
            offset: Some((page - 1) * self.window_size),
            centroids: self.centroids,
        };

        // A degraded call renders as an empty page, not an error.
        let hits = api
            .search(&request)
            .await
            .map(|response| {
                response
                    .documents
                    .into_iter()
                    .map(|doc| SearchHit {
                        document_id: doc.document_id,
                        similarity: doc.document_similarity,
                        text: doc.document_text(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        self.apply(page, hits);
    }

    fn apply(&mut self, page: usize, hits: Vec<SearchHit>) {
        self.page = page;
        self.results = Some(hits);
    }
}

pub async fn run_search(
    config: &Config,
    query: &str,
    category: &str,
    page: Option<usize>,
    interactive: bool,
) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let owner = owner::load_or_create(&config.state.dir)?;
    let mut paginator = Paginator::new(config.search.window_size, config.search.centroids);

    if interactive {
        if !atty::is(atty::Stream::Stdin) {
            anyhow::bail!("--interactive requires a terminal");
        }
        paginator.search(&api, &owner, query, category, 1).await;
        print_page(&paginator);
        interactive_loop(&api, &owner, &mut paginator).await?;
        return Ok(());
    }

    paginator
        .search(&api, &owner, query, category, page.unwrap_or(1))
        .await;
    print_page(&paginator);
    Ok(())
}

fn print_page(paginator: &Paginator) {
    match paginator.results() {
        None => println!("no search issued."),
        Some(hits) if hits.is_empty() => println!("No results."),
        Some(hits) => {
            for (idx, hit) in hits.iter().enumerate() {
                println!(
                    "Result {} has {:.2}% similarity",
                    idx + 1,
                    100.0 * hit.similarity
                );
                println!("    id: {}", hit.document_id);
                println!("    excerpt: \"{}\"", excerpt(&hit.text));
                println!();
            }
            println!("Showing page {} results", paginator.page());
        }
    }
}

fn excerpt(text: &str) -> String {
    let flat = text.replace('\n', " ");
    let flat = flat.trim();
    if flat.chars().count() <= EXCERPT_CHARS {
        flat.to_string()
    } else {
        let head: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}...", head)
    }
}

/// Reads paging and per-result commands from stdin. The loop is sequential,
/// so the search trigger is naturally disabled while a request runs.
async fn interactive_loop(api: &ApiClient, owner: &str, paginator: &mut Paginator) -> Result<()> {
    let mut summaries = fresh_summaries(paginator);
    let stdin = std::io::stdin();

    loop {
        print_hints(paginator);
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        match command {
            "" => print_page(paginator),
            "q" => break,
            "n" => {
                if !paginator.has_next() {
                    println!("no further results.");
                    continue;
                }
                paginator.next(api, owner).await;
                summaries = fresh_summaries(paginator);
                print_page(paginator);
            }
            "p" => {
                let before = paginator.page();
                paginator.previous(api, owner).await;
                if paginator.page() != before {
                    summaries = fresh_summaries(paginator);
                }
                print_page(paginator);
            }
            "v" => {
                if let Some((_, hit)) = pick_hit(paginator, argument) {
                    println!("{}", hit.text);
                }
            }
            "s" => {
                let Some((idx, hit)) = pick_hit(paginator, argument) else {
                    continue;
                };
                let document_id = hit.document_id;
                match summaries[idx].clone() {
                    SummaryState::Loaded(text) => println!("{}", text),
                    SummaryState::Loading => {}
                    SummaryState::NotRequested => {
                        summaries[idx] = SummaryState::Loading;
                        let request = ChatRequest {
                            text: chat::SUMMARY_PROMPT.to_string(),
                            document_ids: Some(vec![document_id]),
                            ..Default::default()
                        };
                        let summary = chat::print_streamed(api, &request).await;
                        summaries[idx] = SummaryState::Loaded(summary);
                    }
                }
            }
            "d" => {
                let Some((idx, hit)) = pick_hit(paginator, argument) else {
                    continue;
                };
                let document_id = hit.document_id;
                api.delete_document(owner, paginator.category(), document_id)
                    .await;
                paginator.remove_hit(document_id);
                summaries.remove(idx);
                print_page(paginator);
            }
            _ => println!("commands: n, p, s <n>, v <n>, d <n>, q"),
        }
    }

    Ok(())
}

fn fresh_summaries(paginator: &Paginator) -> Vec<SummaryState> {
    vec![SummaryState::NotRequested; paginator.results().map_or(0, |hits| hits.len())]
}

fn pick_hit<'a>(paginator: &'a Paginator, argument: Option<&str>) -> Option<(usize, &'a SearchHit)> {
    let hits = paginator.results()?;
    let number: usize = match argument.and_then(|a| a.parse().ok()) {
        Some(n) => n,
        None => {
            println!("expected a result number.");
            return None;
        }
    };
    if number == 0 || number > hits.len() {
        println!("no such result: {}", number);
        return None;
    }
    Some((number - 1, &hits[number - 1]))
}

fn print_hints(paginator: &Paginator) {
    let mut hints = Vec::new();
    if paginator.has_next() {
        hints.push("n=next");
    }
    if paginator.has_previous() {
        hints.push("p=previous");
    }
    if paginator.results().is_some_and(|hits| !hits.is_empty()) {
        hints.push("s <n>=summarize  v <n>=view  d <n>=delete");
    }
    hints.push("q=quit");
    println!("[{}]", hints.join("  "));
}
