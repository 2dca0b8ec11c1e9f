//! HTTP server
//!
//! Every page request fetches its own content, builds a view and renders
//! it. Nothing is cached between requests.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Context;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::Post;
use crate::error::SiteError;
use crate::helpers::local_path;
use crate::templates::{MetaData, SiteData, TemplateRenderer};
use crate::views::listing::{ListingParams, ListingState, PostFilter};
use crate::views::pages::recent_posts;
use crate::views::theme::{Theme, ThemeData, ThemeState};
use crate::views::{
    search_redirect, AboutView, ContactView, DetailPage, Footer, HomeView, NavBar,
};
use crate::Site;

/// Server state
pub struct AppState {
    site: Site,
    templates: TemplateRenderer,
}

impl AppState {
    /// Context shared by every page: site, nav, footer, theme and translations
    fn base_context(&self, headers: &HeaderMap, path: &str, recent: &[Post]) -> Context {
        let config = &self.site.config;
        let ctx = self.site.view_context();

        let theme_state = ThemeState::from_cookie_header(
            headers.get(header::COOKIE).and_then(|v| v.to_str().ok()),
        );
        let default_theme = Theme::parse(&config.default_theme).unwrap_or(Theme::Dark);

        let site = SiteData {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
            description: config.description.clone(),
            url: config.url.clone(),
            language: self.site.i18n.language().to_string(),
            year: chrono::Utc::now().with_timezone(&ctx.tz).year(),
        };

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("nav", &NavBar::build(config, path));
        context.insert("footer", &Footer::build(&ctx, path, recent));
        context.insert("theme", &ThemeData::new(theme_state, default_theme));
        context.insert("t", &self.site.i18n.get_all_translations());
        context.insert("current_path", path);
        context
    }

    fn render(&self, template: &str, context: &Context, status: StatusCode) -> Result<Response, SiteError> {
        let html = self.templates.render(template, context)?;
        Ok((status, Html(html)).into_response())
    }

    async fn recent(&self) -> Vec<Post> {
        recent_posts(self.site.store.as_ref(), self.site.config.blog.recent_limit).await
    }

    /// Themed 404 page
    fn not_found_page(&self, headers: &HeaderMap, path: &str, recent: &[Post], meta: MetaData) -> Result<Response, SiteError> {
        let mut context = self.base_context(headers, path, recent);
        context.insert("meta", &meta);
        self.render("not_found.html", &context, StatusCode::NOT_FOUND)
    }
}

/// Build the application router
pub fn router(site: Site) -> Result<Router> {
    let static_dir = site.static_dir();
    let state = Arc::new(AppState {
        templates: TemplateRenderer::new()?,
        site,
    });

    Ok(Router::new()
        .route("/", get(home_handler))
        .route("/about", get(about_handler))
        .route("/contact", get(contact_handler))
        .route("/blog", get(blog_list_handler))
        .route("/blog/index.json", get(blog_index_handler))
        .route("/blog/:slug", get(blog_detail_handler))
        .route("/search", get(search_handler))
        .route("/theme", get(theme_handler))
        .nest_service("/images", ServeDir::new(static_dir.join("images")))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(site: Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let recent = state.recent().await;
    let view = HomeView::build(&state.site.view_context(), &recent);

    let mut context = state.base_context(&headers, "/", &recent);
    context.insert("meta", &view.meta);
    context.insert("page", &view);
    state.render("home.html", &context, StatusCode::OK)
}

async fn about_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let (about, recent) = tokio::join!(AboutView::load(state.site.store.as_ref()), state.recent());
    let view = AboutView::build(&state.site.view_context(), about.as_ref());

    let mut context = state.base_context(&headers, "/about", &recent);
    context.insert("meta", &view.meta);
    context.insert("page", &view);
    state.render("about.html", &context, StatusCode::OK)
}

async fn contact_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let recent = state.recent().await;
    let view = ContactView::build(&state.site.view_context());

    let mut context = state.base_context(&headers, "/contact", &recent);
    context.insert("meta", &view.meta);
    context.insert("page", &view);
    state.render("contact.html", &context, StatusCode::OK)
}

async fn blog_list_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let filter = PostFilter::from_params(&params);
    let (listing, recent) = tokio::join!(
        ListingState::load(state.site.store.as_ref(), filter),
        state.recent()
    );

    let ctx = state.site.view_context();
    let view = listing.view(&ctx);
    let meta = ctx.meta(
        &state.site.i18n.get("blog.title"),
        &state.site.i18n.get("blog.subtitle"),
        "/blog",
        None,
        None,
    );

    let mut context = state.base_context(&headers, "/blog", &recent);
    context.insert("meta", &meta);
    context.insert("page", &view);
    state.render("blog_list.html", &context, StatusCode::OK)
}

/// Predicate inputs for the browser-side filter
async fn blog_index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let listing = ListingState::load(state.site.store.as_ref(), PostFilter::default()).await;
    Json(listing.index())
}

async fn blog_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    let path = format!("/blog/{}", slug);
    let (page, recent) = tokio::join!(
        DetailPage::assemble(state.site.store.as_ref(), &state.site.config.blog, &slug),
        state.recent()
    );

    let ctx = state.site.view_context();
    let Some(page) = page else {
        tracing::debug!("No published post for slug {:?}", slug);
        let meta = DetailPage::not_found_meta(&ctx, &slug);
        return state.not_found_page(&headers, &path, &recent, meta);
    };

    let view = page.view(&ctx);
    let mut context = state.base_context(&headers, &path, &recent);
    context.insert("meta", &view.meta);
    context.insert("page", &view);
    state.render("blog_detail.html", &context, StatusCode::OK)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Footer search: hand the query to the listing page
async fn search_handler(Query(params): Query<SearchParams>) -> Redirect {
    let target = search_redirect(params.q.as_deref().unwrap_or_default());
    Redirect::to(target.as_deref().unwrap_or("/blog"))
}

#[derive(Debug, Deserialize)]
struct ThemeParams {
    set: Option<String>,
    #[serde(rename = "return")]
    return_to: Option<String>,
}

/// Persist the visitor's theme choice and go back
async fn theme_handler(Query(params): Query<ThemeParams>) -> Response {
    let target = params
        .return_to
        .as_deref()
        .and_then(local_path)
        .unwrap_or("/");
    let redirect = Redirect::to(target);

    match params.set.as_deref().and_then(Theme::parse) {
        Some(theme) => ([(header::SET_COOKIE, theme.cookie())], redirect).into_response(),
        None => redirect.into_response(),
    }
}

async fn fallback_handler(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, SiteError> {
    tracing::debug!("No route for {}", uri.path());
    let recent = state.recent().await;
    let i18n = &state.site.i18n;
    let meta = state.site.view_context().meta(
        &i18n.get("not_found.title"),
        &i18n.get("not_found.text"),
        uri.path(),
        None,
        None,
    );
    state.not_found_page(&headers, uri.path(), &recent, meta)
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
