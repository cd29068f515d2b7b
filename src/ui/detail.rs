//! Detail view for a movie or TV show
//!
//! Derives what the page shows from the fetch status of the current route and
//! the local overview toggle, then renders it: hero (poster, title, genres,
//! overview, cast), trailer with the episode grid, videos and similar titles.
//!
//! State machine:
//!
//! ```text
//! Loading --ok--> Displaying{Collapsed} <--toggle--> Displaying{Expanded}
//!    \--err--> Failed
//! any --route change--> Loading (overview reset to Collapsed)
//! ```

use std::borrow::Cow;
use std::fmt;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap},
};
use serde::Serialize;

use crate::models::{CastMember, Genre, MediaType, RouteKey, ShowId, ShowRecord, VideoRef};
use crate::query::QuerySnapshot;
use crate::ui::reveal::{Reveal, RevealSection};
use crate::ui::similar::SimilarPanel;
use crate::ui::Theme;

/// Overviews longer than this many characters get the show more/less toggle
pub const OVERVIEW_LIMIT: usize = 280;
pub const ELLIPSIS: &str = "...";
pub const ERROR_MESSAGE: &str = "Something went wrong!";
pub const TRAILER_EMBED_URL: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";

/// Fixed labels of the episode grid. Not backed by fetched data.
pub const EPISODE_LABELS: [&str; 8] = [
    "Episode 1",
    "Episode 2",
    "Episode 3",
    "Episode 4",
    "Episode 5",
    "Episode 6",
    "Episode 7",
    "Episode 22",
];

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
const CAST_LIMIT: usize = 10;
const POSTER_WIDTH: u16 = 18;

// =============================================================================
// Fetch Status
// =============================================================================

/// Build the fetch key from raw route segments. The id is not range-checked;
/// anything non-numeric is handed to the fetcher, which reports the error.
pub fn derive_fetch_key(category: &str, id: &str) -> RouteKey {
    RouteKey::new(category, ShowId::parse(id))
}

/// What the view knows about the remote record. Only `Ready` carries it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchStatus<'a> {
    InitialLoading,
    BackgroundFetching,
    Error,
    Ready(&'a ShowRecord),
}

impl<'a> FetchStatus<'a> {
    /// Loading wins over fetching, fetching over error, error over data
    pub fn from_snapshot(snapshot: &QuerySnapshot<'a, ShowRecord>) -> Self {
        if snapshot.is_loading {
            FetchStatus::InitialLoading
        } else if snapshot.is_fetching {
            FetchStatus::BackgroundFetching
        } else if snapshot.is_error {
            FetchStatus::Error
        } else {
            match snapshot.data {
                Some(record) => FetchStatus::Ready(record),
                None => FetchStatus::InitialLoading,
            }
        }
    }

    pub fn record(&self) -> Option<&'a ShowRecord> {
        match self {
            FetchStatus::Ready(record) => Some(record),
            _ => None,
        }
    }
}

// =============================================================================
// View State
// =============================================================================

/// Whether a long overview is shown in full
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverviewState {
    #[default]
    Collapsed,
    Expanded,
}

impl OverviewState {
    pub fn toggled(self) -> Self {
        match self {
            OverviewState::Collapsed => OverviewState::Expanded,
            OverviewState::Expanded => OverviewState::Collapsed,
        }
    }
}

/// Phase of the page as the user sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    Failed,
    Displaying { overview: OverviewState },
}

/// Detail view state, keyed by the route it shows
#[derive(Debug, Clone)]
pub struct DetailView {
    route: RouteKey,
    overview: OverviewState,
}

impl DetailView {
    pub fn new(route: RouteKey) -> Self {
        Self {
            route,
            overview: OverviewState::default(),
        }
    }

    pub fn route(&self) -> &RouteKey {
        &self.route
    }

    pub fn overview_state(&self) -> OverviewState {
        self.overview
    }

    /// Switch to another route. Local state belongs to the old route and is
    /// reset. Returns whether the route changed.
    pub fn set_route(&mut self, route: RouteKey) -> bool {
        if route == self.route {
            return false;
        }
        self.route = route;
        self.overview = OverviewState::Collapsed;
        true
    }

    pub fn phase(&self, status: &FetchStatus<'_>) -> DetailPhase {
        match status {
            FetchStatus::InitialLoading | FetchStatus::BackgroundFetching => DetailPhase::Loading,
            FetchStatus::Error => DetailPhase::Failed,
            FetchStatus::Ready(_) => DetailPhase::Displaying {
                overview: self.overview,
            },
        }
    }

    /// Flip the overview toggle. Only reachable while displaying a record whose
    /// overview is long enough to be truncated; otherwise nothing changes.
    pub fn toggle_overview(&mut self, status: &FetchStatus<'_>) -> bool {
        match status {
            FetchStatus::Ready(record) if is_truncatable(&record.overview) => {
                self.overview = self.overview.toggled();
                true
            }
            _ => false,
        }
    }

    /// Decide the render branch for a status
    pub fn on_status_change<'a>(&self, status: &FetchStatus<'a>) -> DetailRender<'a> {
        match *status {
            FetchStatus::InitialLoading | FetchStatus::BackgroundFetching => DetailRender::Loader,
            FetchStatus::Error => DetailRender::Error(ERROR_MESSAGE),
            FetchStatus::Ready(record) => {
                DetailRender::Page(DetailPage::shape(&self.route, record, self.overview))
            }
        }
    }

    /// Render the detail view
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        status: &FetchStatus<'_>,
        reveal: &Reveal,
        similar: &SimilarPanel<'_>,
    ) {
        match self.on_status_change(status) {
            DetailRender::Loader => render_message(frame, area, "⟳ Loading...", Theme::loading()),
            DetailRender::Error(message) => {
                render_message(frame, area, &format!("✗ {}", message), Theme::error())
            }
            DetailRender::Page(page) => render_page(frame, area, &page, reveal, similar),
        }
    }
}

// =============================================================================
// Derived Fields
// =============================================================================

/// Heading for the page and the document title
pub fn display_title(record: &ShowRecord) -> &str {
    record.display_title()
}

pub fn is_truncatable(overview: &str) -> bool {
    overview.chars().count() > OVERVIEW_LIMIT
}

/// Overview as displayed: unchanged when short or expanded, otherwise cut
/// to [`OVERVIEW_LIMIT`] characters followed by [`ELLIPSIS`].
pub fn overview_text(overview: &str, state: OverviewState) -> Cow<'_, str> {
    if !is_truncatable(overview) || state == OverviewState::Expanded {
        return Cow::Borrowed(overview);
    }
    let cut = overview
        .char_indices()
        .nth(OVERVIEW_LIMIT)
        .map(|(i, _)| i)
        .unwrap_or(overview.len());
    Cow::Owned(format!("{}{}", &overview[..cut], ELLIPSIS))
}

/// Label of the toggle control; `None` when the control is hidden
pub fn overview_toggle_label(overview: &str, state: OverviewState) -> Option<&'static str> {
    if !is_truncatable(overview) {
        return None;
    }
    Some(match state {
        OverviewState::Collapsed => "show more",
        OverviewState::Expanded => "show less",
    })
}

/// Heading of the similar-titles panel
pub fn similar_label(category: &str) -> &'static str {
    match MediaType::from_category(category) {
        Some(MediaType::Movie) => "Similar movies",
        Some(MediaType::Tv) | None => "Similar series",
    }
}

/// One colour stop of the hero gradient. `alpha: None` prints without an
/// alpha component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Option<f32>,
}

impl GradientStop {
    const fn black(alpha: Option<f32>) -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            alpha,
        }
    }
}

impl fmt::Display for GradientStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.alpha {
            Some(alpha) => write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, alpha),
            None => write!(f, "rgba({},{},{})", self.r, self.g, self.b),
        }
    }
}

/// Bottom-to-top gradient laid over the poster
const BACKDROP_GRADIENT: [GradientStop; 4] = [
    GradientStop::black(None),
    GradientStop::black(Some(0.98)),
    GradientStop::black(Some(0.6)),
    GradientStop::black(Some(0.4)),
];

/// Hero background: gradient layers over the poster image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackdropStyle {
    pub gradient: [GradientStop; 4],
    pub image_url: Option<String>,
    pub position: &'static str,
    pub size: &'static str,
}

impl BackdropStyle {
    /// CSS `background` declarations for the style
    pub fn to_css(&self) -> String {
        let stops: Vec<String> = self.gradient.iter().map(|s| s.to_string()).collect();
        let mut image = format!("linear-gradient(to top, {})", stops.join(", "));
        if let Some(url) = &self.image_url {
            image.push_str(&format!(", url('{}')", url));
        }
        format!(
            "background-image: {}; background-position: {}; background-size: {}",
            image, self.position, self.size
        )
    }

    /// Colour at the bottom of the gradient, used as the hero background
    pub fn base_color(&self) -> Color {
        let stop = self.gradient[0];
        Color::Rgb(stop.r, stop.g, stop.b)
    }
}

pub fn backdrop_style(poster_path: Option<&str>) -> BackdropStyle {
    BackdropStyle {
        gradient: BACKDROP_GRADIENT,
        image_url: poster_path
            .map(|path| format!("{}/{}", IMAGE_BASE_URL, path.trim_start_matches('/'))),
        position: "top",
        size: "cover",
    }
}

// =============================================================================
// Render Model
// =============================================================================

/// Render branch chosen for a fetch status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "page", rename_all = "lowercase")]
pub enum DetailRender<'a> {
    Loader,
    Error(&'static str),
    Page(DetailPage<'a>),
}

/// Link to the similar-titles panel of the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarSection {
    pub label: &'static str,
    pub category: String,
    pub id: ShowId,
}

/// Fields of a ready record, shaped for the presentational sections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPage<'a> {
    pub title: &'a str,
    pub genres: &'a [Genre],
    pub overview: Cow<'a, str>,
    pub overview_toggle: Option<&'static str>,
    pub cast: &'a [CastMember],
    pub backdrop: BackdropStyle,
    pub trailer_url: &'static str,
    pub episodes: &'static [&'static str],
    pub videos: &'a [VideoRef],
    pub similar: SimilarSection,
}

impl<'a> DetailPage<'a> {
    pub fn shape(route: &RouteKey, record: &'a ShowRecord, overview: OverviewState) -> Self {
        Self {
            title: display_title(record),
            genres: &record.genres,
            overview: overview_text(&record.overview, overview),
            overview_toggle: overview_toggle_label(&record.overview, overview),
            cast: &record.credits.cast,
            backdrop: backdrop_style(record.poster_path.as_deref()),
            trailer_url: TRAILER_EMBED_URL,
            episodes: &EPISODE_LABELS,
            videos: &record.videos.results,
            similar: SimilarSection {
                label: similar_label(&route.category),
                category: route.category.clone(),
                id: route.id.clone(),
            },
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

/// Single centred message filling the whole area
fn render_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines = vec![Line::from(""); pad as usize];
    lines.push(Line::from(Span::styled(message.to_string(), style)));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Hero and trailer on the left, videos and similar titles on the right
fn render_page(
    frame: &mut Frame,
    area: Rect,
    page: &DetailPage<'_>,
    reveal: &Reveal,
    similar: &SimilarPanel<'_>,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(8)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(columns[1]);

    render_hero(frame, left[0], page, reveal);
    render_trailer(frame, left[1], page);
    render_videos(frame, right[0], page.videos);
    similar.render(frame, right[1]);
}

fn render_hero(frame: &mut Frame, area: Rect, page: &DetailPage<'_>, reveal: &Reveal) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .style(Style::default().bg(page.backdrop.base_color()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(POSTER_WIDTH), Constraint::Min(1)])
        .split(inner);

    render_poster(frame, chunks[0], page);

    let mut lines = Vec::new();

    if reveal.is_visible(RevealSection::Heading) {
        lines.push(Line::from(Span::styled(
            page.title.to_string(),
            Theme::heading(),
        )));
        lines.push(Line::from(""));
    }

    if reveal.is_visible(RevealSection::Genres) && !page.genres.is_empty() {
        let mut spans = Vec::new();
        for genre in page.genres {
            spans.push(Span::styled(format!(" {} ", genre.name), Theme::badge()));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if reveal.is_visible(RevealSection::Overview) {
        let mut overview_lines: Vec<Line> = page
            .overview
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Theme::text())))
            .collect();
        if let Some(label) = page.overview_toggle {
            let toggle = vec![Span::raw(" "), Span::styled(label, Theme::toggle())];
            match overview_lines.last_mut() {
                Some(last) => last.spans.extend(toggle),
                None => overview_lines.push(Line::from(toggle)),
            }
        }
        lines.extend(overview_lines);
        lines.push(Line::from(""));
    }

    if reveal.is_visible(RevealSection::Cast) && !page.cast.is_empty() {
        lines.push(Line::from(Span::styled("CAST", Theme::title())));
        for member in page.cast.iter().take(CAST_LIMIT) {
            let mut spans = vec![
                Span::styled("• ", Theme::dimmed()),
                Span::styled(member.name.clone(), Theme::text()),
            ];
            if !member.character.is_empty() {
                spans.push(Span::styled(
                    format!(" as {}", member.character),
                    Theme::dimmed(),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}

/// Poster frame; the terminal can't show the image, so it shows its alt text
fn render_poster(frame: &mut Frame, area: Rect, page: &DetailPage<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Theme::border());

    let caption = if page.backdrop.image_url.is_some() {
        Span::styled("▣ poster", Theme::secondary())
    } else {
        Span::styled("no poster", Theme::dimmed())
    };

    let poster = Paragraph::new(vec![
        Line::from(caption),
        Line::from(""),
        Line::from(Span::styled(page.title.to_string(), Theme::dimmed())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);

    frame.render_widget(poster, area);
}

/// Trailer embed and the static episode grid
fn render_trailer(frame: &mut Frame, area: Rect, page: &DetailPage<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" TRAILER ", Theme::title()));

    let mut episodes = Vec::new();
    for (i, label) in page.episodes.iter().enumerate() {
        let style = if i == 0 {
            Theme::episode_active()
        } else {
            Theme::episode()
        };
        episodes.push(Span::styled(format!(" ▶ {} ", label), style));
        episodes.push(Span::raw(" "));
    }

    let lines = vec![
        Line::from(Span::styled(page.title.to_string(), Theme::secondary())),
        Line::from(vec![
            Span::styled("▶ ", Theme::keybind()),
            Span::styled(page.trailer_url, Theme::dimmed()),
        ]),
        Line::from(""),
        Line::from(episodes),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_videos(frame: &mut Frame, area: Rect, videos: &[VideoRef]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" VIDEOS ({}) ", videos.len()),
            Theme::title(),
        ));

    if videos.is_empty() {
        let empty = Paragraph::new("No videos")
            .style(Theme::dimmed())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = videos
        .iter()
        .map(|video| {
            ListItem::new(Line::from(vec![
                Span::styled("▶ ", Theme::keybind()),
                Span::styled(video.name.clone(), Theme::text()),
                Span::styled(format!(" [{}]", video.kind), Theme::dimmed()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Credits, ShowHeading, Videos};

    fn record(overview: &str) -> ShowRecord {
        ShowRecord {
            heading: ShowHeading::Title("Dune".into()),
            poster_path: Some("/d5NXSklXo0qyIYkgV94XAgMIckC.jpg".into()),
            overview: overview.to_string(),
            genres: vec![Genre {
                id: 878,
                name: "Science Fiction".into(),
            }],
            videos: Videos::default(),
            credits: Credits::default(),
        }
    }

    fn route() -> RouteKey {
        RouteKey::new("movie", ShowId::Numeric(438631))
    }

    // =========================================================================
    // Fetch Key / Status
    // =========================================================================

    #[test]
    fn test_derive_fetch_key() {
        let key = derive_fetch_key("tv", "94605");
        assert_eq!(key.category, "tv");
        assert_eq!(key.id, ShowId::Numeric(94605));

        let key = derive_fetch_key("movie", "dune");
        assert_eq!(key.id, ShowId::Malformed("dune".into()));
    }

    fn snap<'a>(
        is_loading: bool,
        is_fetching: bool,
        is_error: bool,
        data: Option<&'a ShowRecord>,
    ) -> QuerySnapshot<'a, ShowRecord> {
        QuerySnapshot {
            is_loading,
            is_fetching,
            is_error,
            data,
        }
    }

    #[test]
    fn test_status_precedence() {
        let rec = record("short");

        assert_eq!(
            FetchStatus::from_snapshot(&snap(true, true, false, None)),
            FetchStatus::InitialLoading
        );
        assert_eq!(
            FetchStatus::from_snapshot(&snap(false, true, true, Some(&rec))),
            FetchStatus::BackgroundFetching
        );
        assert_eq!(
            FetchStatus::from_snapshot(&snap(false, false, true, Some(&rec))),
            FetchStatus::Error
        );
        assert_eq!(
            FetchStatus::from_snapshot(&snap(false, false, false, Some(&rec))),
            FetchStatus::Ready(&rec)
        );
    }

    #[test]
    fn test_record_only_when_ready() {
        let rec = record("short");
        assert!(FetchStatus::InitialLoading.record().is_none());
        assert!(FetchStatus::BackgroundFetching.record().is_none());
        assert!(FetchStatus::Error.record().is_none());
        assert_eq!(FetchStatus::Ready(&rec).record(), Some(&rec));
    }

    // =========================================================================
    // Render Branches
    // =========================================================================

    #[test]
    fn test_loading_and_fetching_render_loader() {
        let view = DetailView::new(route());
        assert_eq!(
            view.on_status_change(&FetchStatus::InitialLoading),
            DetailRender::Loader
        );
        assert_eq!(
            view.on_status_change(&FetchStatus::BackgroundFetching),
            DetailRender::Loader
        );
    }

    #[test]
    fn test_error_renders_fixed_message() {
        let view = DetailView::new(route());
        assert_eq!(
            view.on_status_change(&FetchStatus::Error),
            DetailRender::Error("Something went wrong!")
        );
    }

    #[test]
    fn test_ready_renders_page() {
        let rec = record("A noble family becomes embroiled in a war.");
        let view = DetailView::new(route());

        let DetailRender::Page(page) = view.on_status_change(&FetchStatus::Ready(&rec)) else {
            panic!("Expected page");
        };
        assert_eq!(page.title, "Dune");
        assert_eq!(page.genres.len(), 1);
        assert_eq!(page.overview, "A noble family becomes embroiled in a war.");
        assert_eq!(page.overview_toggle, None);
        assert_eq!(page.trailer_url, TRAILER_EMBED_URL);
        assert_eq!(page.episodes.len(), 8);
        assert_eq!(page.similar.label, "Similar movies");
        assert_eq!(page.similar.id, ShowId::Numeric(438631));
    }

    // =========================================================================
    // Phases
    // =========================================================================

    #[test]
    fn test_phase_transitions() {
        let rec = record(&"x".repeat(400));
        let mut view = DetailView::new(route());

        assert_eq!(view.phase(&FetchStatus::InitialLoading), DetailPhase::Loading);
        assert_eq!(view.phase(&FetchStatus::Error), DetailPhase::Failed);
        assert_eq!(
            view.phase(&FetchStatus::Ready(&rec)),
            DetailPhase::Displaying {
                overview: OverviewState::Collapsed
            }
        );

        assert!(view.toggle_overview(&FetchStatus::Ready(&rec)));
        assert_eq!(
            view.phase(&FetchStatus::Ready(&rec)),
            DetailPhase::Displaying {
                overview: OverviewState::Expanded
            }
        );
    }

    #[test]
    fn test_toggle_ignored_unless_displaying() {
        let mut view = DetailView::new(route());
        assert!(!view.toggle_overview(&FetchStatus::InitialLoading));
        assert!(!view.toggle_overview(&FetchStatus::Error));
        assert_eq!(view.overview_state(), OverviewState::Collapsed);
    }

    #[test]
    fn test_toggle_ignored_for_short_overview() {
        let rec = record("Short.");
        let mut view = DetailView::new(route());
        assert!(!view.toggle_overview(&FetchStatus::Ready(&rec)));
        assert_eq!(view.overview_state(), OverviewState::Collapsed);
    }

    #[test]
    fn test_route_change_resets_overview() {
        let rec = record(&"x".repeat(400));
        let mut view = DetailView::new(route());
        view.toggle_overview(&FetchStatus::Ready(&rec));
        assert_eq!(view.overview_state(), OverviewState::Expanded);

        // Same route keeps state
        assert!(!view.set_route(route()));
        assert_eq!(view.overview_state(), OverviewState::Expanded);

        assert!(view.set_route(RouteKey::new("tv", ShowId::Numeric(94605))));
        assert_eq!(view.overview_state(), OverviewState::Collapsed);
    }

    // =========================================================================
    // Overview Truncation
    // =========================================================================

    #[test]
    fn test_short_overview_is_identity() {
        let text = "a".repeat(100);
        assert_eq!(overview_text(&text, OverviewState::Collapsed), text);
        assert_eq!(overview_text(&text, OverviewState::Expanded), text);
        assert_eq!(overview_toggle_label(&text, OverviewState::Collapsed), None);
    }

    #[test]
    fn test_overview_at_limit_is_not_truncated() {
        let text = "b".repeat(OVERVIEW_LIMIT);
        assert!(!is_truncatable(&text));
        assert_eq!(overview_text(&text, OverviewState::Collapsed), text);
    }

    #[test]
    fn test_long_overview_collapsed_and_expanded() {
        let text = "c".repeat(OVERVIEW_LIMIT + 1);

        let collapsed = overview_text(&text, OverviewState::Collapsed);
        assert_eq!(collapsed, format!("{}...", "c".repeat(OVERVIEW_LIMIT)));
        assert_eq!(overview_text(&text, OverviewState::Expanded), text);

        assert_eq!(
            overview_toggle_label(&text, OverviewState::Collapsed),
            Some("show more")
        );
        assert_eq!(
            overview_toggle_label(&text, OverviewState::Expanded),
            Some("show less")
        );
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(OVERVIEW_LIMIT + 20);
        let collapsed = overview_text(&text, OverviewState::Collapsed);
        assert_eq!(collapsed.chars().count(), OVERVIEW_LIMIT + ELLIPSIS.len());
        assert!(collapsed.ends_with(ELLIPSIS));

        let exact = "é".repeat(OVERVIEW_LIMIT);
        assert_eq!(overview_text(&exact, OverviewState::Collapsed), exact);
    }

    #[test]
    fn test_double_toggle_round_trip() {
        let rec = record(&"d".repeat(500));
        let mut view = DetailView::new(route());
        let status = FetchStatus::Ready(&rec);

        let before = view.on_status_change(&status);
        view.toggle_overview(&status);
        assert_ne!(view.on_status_change(&status), before);
        view.toggle_overview(&status);
        assert_eq!(view.on_status_change(&status), before);
    }

    // =========================================================================
    // Titles / Labels / Backdrop
    // =========================================================================

    #[test]
    fn test_display_title_fallbacks() {
        let mut rec = record("");
        assert_eq!(display_title(&rec), "Dune");

        rec.heading = ShowHeading::from_fields(None, Some("Arcane".into()));
        assert_eq!(display_title(&rec), "Arcane");

        rec.heading = ShowHeading::from_fields(None, None);
        assert_eq!(display_title(&rec), crate::models::UNTITLED);
    }

    #[test]
    fn test_similar_label() {
        assert_eq!(similar_label("movie"), "Similar movies");
        assert_eq!(similar_label("tv"), "Similar series");
        assert_eq!(similar_label("anime"), "Similar series");
    }

    #[test]
    fn test_backdrop_style() {
        let style = backdrop_style(Some("/poster.jpg"));
        assert_eq!(
            style.image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/original/poster.jpg")
        );
        assert_eq!(style.base_color(), Color::Rgb(0, 0, 0));
        assert_eq!(
            style.to_css(),
            "background-image: linear-gradient(to top, rgba(0,0,0), rgba(0,0,0,0.98), \
             rgba(0,0,0,0.6), rgba(0,0,0,0.4)), url('https://image.tmdb.org/t/p/original/poster.jpg'); \
             background-position: top; background-size: cover"
        );
    }

    #[test]
    fn test_gradient_stops_format() {
        let stops: Vec<String> = BACKDROP_GRADIENT.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            stops,
            ["rgba(0,0,0)", "rgba(0,0,0,0.98)", "rgba(0,0,0,0.6)", "rgba(0,0,0,0.4)"]
        );
    }

    #[test]
    fn test_backdrop_without_poster() {
        let style = backdrop_style(None);
        assert!(style.image_url.is_none());
        assert!(!style.to_css().contains("url("));
    }
}
