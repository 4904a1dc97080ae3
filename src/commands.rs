use std::sync::Arc;

use anyhow::Context as _;

use crate::auth::TokenSession;
use crate::cli::{BooksCommand, Cli, Command, GoogleCommand, HomeArgs, PageArgs, SearchArgs};
use crate::client::{CatalogClient, ListKind};
use crate::config::ApiConfig;
use crate::cover::{CoverRef, resolve_cover};
use crate::error::ApiError;
use crate::fetcher::{LoadOutcome, PagedFetcher};
use crate::models::{BookSummary, GoogleBookSearchResult, Page, UnifiedSearchResponse};
use crate::pagination::{PaginationControl, to_display, to_model};
use crate::search::SearchAggregator;
use crate::views::{HomeInputs, HomeView};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ApiConfig::load(cli.config.as_deref()).context("load config")?;
    tracing::debug!(base_url = %config.base_url(), page_size = config.page_size, "loaded config");

    let session = Arc::new(TokenSession::new(config.token.clone()));
    let client = CatalogClient::new(config, session);
    let json = cli.json;

    match cli.command {
        Command::Books { command } => match command {
            BooksCommand::List(args) => list(&client, ListKind::All, &args, json).await,
            BooksCommand::Mine(args) => list(&client, ListKind::Mine, &args, json).await,
            BooksCommand::Borrowed(args) => list(&client, ListKind::Borrowed, &args, json).await,
            BooksCommand::Read(args) => list(&client, ListKind::Read, &args, json).await,
            BooksCommand::Returned(args) => list(&client, ListKind::Returned, &args, json).await,
            BooksCommand::Show(args) => show_book(&client, args.id, json).await,
        },
        Command::Search(args) => search(&client, &args, json).await,
        Command::Google { command } => match command {
            GoogleCommand::Show(args) => google_show(&client, &args.google_id, json).await,
            GoogleCommand::Add(args) => google_add(&client, &args.google_id, json).await,
        },
        Command::Home(args) => home(&client, &args, json).await,
    }
}

async fn list(
    client: &CatalogClient,
    kind: ListKind,
    args: &PageArgs,
    json: bool,
) -> anyhow::Result<()> {
    let page = to_model(args.page).ok_or_else(|| anyhow::anyhow!("--page starts at 1"))?;
    let size = args.size.unwrap_or(client.config().page_size);

    let fetcher = if kind.requires_auth() {
        PagedFetcher::<BookSummary>::gated(kind.label(), client.session())
    } else {
        PagedFetcher::<BookSummary>::new(kind.label())
    };
    let outcome = fetcher.load(&client.source(kind), page, size).await;
    if outcome == LoadOutcome::SkippedUnauthenticated {
        println!("Log in to see the {} list.", kind.label());
        return Ok(());
    }

    let state = fetcher.state();
    if let Some(err) = state.error {
        let message = err.kind().user_message();
        return Err(anyhow::Error::new(err).context(message));
    }
    let Some(page) = state.data else {
        anyhow::bail!("{} fetch finished without data", kind.label());
    };

    if json {
        return print_json(&page);
    }
    print_page(&page);
    Ok(())
}

async fn show_book(client: &CatalogClient, id: i64, json: bool) -> anyhow::Result<()> {
    let book = client.find_book(id).await.map_err(api_failure)?;
    if json {
        return print_json(&book);
    }

    println!("#{} {}", book.id, book.title);
    println!("  author: {}", book.author_name);
    if let Some(isbn) = &book.isbn {
        println!("  isbn: {isbn}");
    }
    if let Some(owner) = &book.owner {
        println!("  owner: {owner}");
    }
    println!("  rating: {:.1}", book.rate);
    match resolve_cover(client.config(), book.id, book.cover.as_ref()) {
        CoverRef::Url(url) => println!("  cover: {url}"),
        CoverRef::Inline { data_uri } => {
            println!("  cover: inline image ({} bytes)", data_uri.len());
        }
    }
    if let Some(synopsis) = &book.synopsis {
        println!();
        println!("{synopsis}");
    }
    Ok(())
}

async fn search(client: &CatalogClient, args: &SearchArgs, json: bool) -> anyhow::Result<()> {
    let aggregator = SearchAggregator::new(client.clone());
    let response = aggregator
        .search(&args.query, args.max_local, args.max_google)
        .await
        .map_err(api_failure)?;

    if json {
        return print_json(&response);
    }
    print_search(&response);
    Ok(())
}

async fn google_show(client: &CatalogClient, google_id: &str, json: bool) -> anyhow::Result<()> {
    let aggregator = SearchAggregator::new(client.clone());
    let book = aggregator
        .get_by_external_id(google_id)
        .await
        .map_err(api_failure)?;

    if json {
        return print_json(&book);
    }
    print_google_book(&book);
    Ok(())
}

async fn google_add(client: &CatalogClient, google_id: &str, json: bool) -> anyhow::Result<()> {
    let aggregator = SearchAggregator::new(client.clone());
    let imported = aggregator
        .add_from_external(google_id)
        .await
        .map_err(api_failure)?;

    if json {
        return print_json(&serde_json::json!({
            "bookId": imported.book_id,
            "next": imported.next_route.path(),
        }));
    }
    println!("Added to library as #{}", imported.book_id);
    println!("Next: {}", imported.next_route.path());
    Ok(())
}

async fn home(client: &CatalogClient, args: &HomeArgs, json: bool) -> anyhow::Result<()> {
    let size = args.size.unwrap_or(client.config().page_size);
    let session = client.session();

    let catalog = PagedFetcher::<BookSummary>::new("catalog");
    let mine = PagedFetcher::<BookSummary>::gated("my books", Arc::clone(&session));
    let borrowed = PagedFetcher::<BookSummary>::gated("borrowed", Arc::clone(&session));
    let read = PagedFetcher::<BookSummary>::gated("read", Arc::clone(&session));

    let (catalog_src, mine_src, borrowed_src, read_src) = (
        client.source(ListKind::All),
        client.source(ListKind::Mine),
        client.source(ListKind::Borrowed),
        client.source(ListKind::Read),
    );
    tokio::join!(
        catalog.load(&catalog_src, 0, size),
        mine.load(&mine_src, 0, size),
        borrowed.load(&borrowed_src, 0, size),
        read.load(&read_src, 0, size),
    );

    let catalog = catalog.state();
    if let Some(err) = catalog.error {
        let message = err.kind().user_message();
        return Err(anyhow::Error::new(err).context(message));
    }
    let personal = [mine.state(), borrowed.state(), read.state()];
    for (fetcher, state) in ["my books", "borrowed", "read"].into_iter().zip(&personal) {
        if let Some(err) = &state.error {
            tracing::warn!(fetcher, error = %err, "personal list unavailable");
        }
    }
    let [mine, borrowed, read] = personal;

    let logged_in = session.is_logged_in();
    let view = HomeView::derive(
        logged_in,
        HomeInputs {
            catalog: catalog.data.as_ref(),
            my_books: mine.data.as_ref(),
            borrowed: borrowed.data.as_ref(),
            read: read.data.as_ref(),
        },
    );

    if json {
        return print_json(&view);
    }

    print_section("Trending", &view.trending);
    if !logged_in {
        println!();
        println!("Log in to see your reading lists.");
        return Ok(());
    }
    println!();
    println!("Currently reading");
    match &view.currently_reading {
        Some(book) => println!("{}", book_line(book)),
        None => println!("  (nothing yet)"),
    }
    println!();
    print_section("To read", &view.to_read);
    println!();
    print_section("Favorites", &view.favorites);
    Ok(())
}

fn api_failure(err: ApiError) -> anyhow::Error {
    let message = err.kind().user_message();
    anyhow::Error::new(err).context(message)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{out}");
    Ok(())
}

fn book_line(book: &BookSummary) -> String {
    format!("{:>6}  {} by {}", format!("#{}", book.id), book.title, book.author_name)
}

fn print_section(title: &str, books: &[BookSummary]) {
    println!("{title}");
    if books.is_empty() {
        println!("  (nothing yet)");
    }
    for book in books {
        println!("{}", book_line(book));
    }
}

fn print_page(page: &Page<BookSummary>) {
    if page.is_empty() {
        if page.total_elements > 0 {
            println!(
                "Page {} is past the last page ({}).",
                to_display(page.number),
                page.total_pages
            );
        } else {
            println!("No books found.");
        }
        return;
    }
    for book in &page.content {
        println!("{}", book_line(book));
    }
    if let Some(view) = PaginationControl::from_page(page).render() {
        println!();
        println!(
            "Showing {}-{} of {} (page {} of {})",
            view.range_start, view.range_end, view.total_elements, view.display_page, view.total_pages
        );
    }
}

fn print_search(response: &UnifiedSearchResponse) {
    if response.is_empty() {
        println!("No results");
        return;
    }

    println!(
        "Local library ({} of {})",
        response.local_books.len(),
        response.total_local_results
    );
    for book in &response.local_books {
        println!("{}", book_line(book));
    }
    println!();
    println!(
        "Google Books ({} of {})",
        response.google_books.len(),
        response.total_google_results
    );
    for book in &response.google_books {
        println!("  [{}] {} by {}", book.google_id, book.title, book.author_name);
    }
    println!();
    println!("{} results for {:?}", response.total_results, response.query);
}

fn print_google_book(book: &GoogleBookSearchResult) {
    println!("[{}] {}", book.google_id, book.title);
    println!("  author: {}", book.author_name);
    let optional = [
        ("isbn", &book.isbn),
        ("published", &book.published_date),
        ("category", &book.category),
        ("thumbnail", &book.thumbnail_url),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if let Some(description) = &book.description {
        println!();
        println!("{description}");
    }
}
