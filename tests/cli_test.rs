//! CLI Command Tests
//!
//! Argument parsing and the plain-text/JSON shape of `info` output.

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use caper::cli::{Cli, Command};
    use clap::Parser;

    #[test]
    fn test_open_alias() {
        let cli = Cli::parse_from(["caper", "o", "tv", "94605"]);
        match cli.command {
            Command::Open(cmd) => {
                assert_eq!(cmd.route.category, "tv");
                assert_eq!(cmd.route.id, "94605");
            }
            _ => panic!("Expected Open command"),
        }
    }

    #[test]
    fn test_info_defaults() {
        let cli = Cli::parse_from(["caper", "info", "movie", "438631"]);
        assert!(!cli.json);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        match cli.command {
            Command::Info(cmd) => assert!(!cmd.full_overview),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_id_is_not_validated_by_parser() {
        // Malformed ids reach the fetch layer, which reports them
        let cli = Cli::parse_from(["caper", "info", "movie", "not-a-number"]);
        match cli.command {
            Command::Info(cmd) => assert_eq!(cmd.route.id, "not-a-number"),
            _ => panic!("Expected Info command"),
        }
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["caper", "search", "dune"]).is_err());
    }
}

// =============================================================================
// Info Output Tests
// =============================================================================

mod info_output {
    use caper::commands::{format_page, InfoReport, SimilarReport};
    use caper::models::{
        CastMember, Credits, Genre, RouteKey, ShowHeading, ShowId, ShowRecord, SimilarTitle,
        Videos,
    };
    use caper::ui::detail::{DetailRender, DetailView, FetchStatus, OverviewState};

    fn record(overview: &str) -> ShowRecord {
        ShowRecord {
            heading: ShowHeading::Name("Arcane".into()),
            poster_path: None,
            overview: overview.into(),
            genres: vec![
                Genre {
                    id: 16,
                    name: "Animation".into(),
                },
                Genre {
                    id: 10759,
                    name: "Action & Adventure".into(),
                },
            ],
            videos: Videos::default(),
            credits: Credits {
                cast: vec![CastMember {
                    id: 1,
                    name: "Hailee Steinfeld".into(),
                    character: "Vi".into(),
                    profile_path: None,
                }],
            },
        }
    }

    fn titles() -> Vec<SimilarTitle> {
        vec![SimilarTitle {
            id: 1399,
            title: "Game of Thrones".into(),
            year: Some(2011),
            vote_average: 8.4,
        }]
    }

    #[test]
    fn test_format_page_text() {
        let rec = record("Sisters on opposite sides of a war.");
        let view = DetailView::new(RouteKey::new("tv", ShowId::Numeric(94605)));
        let DetailRender::Page(page) = view.on_status_change(&FetchStatus::Ready(&rec)) else {
            panic!("Expected page");
        };
        let similar = titles();
        let text = format_page(
            &page,
            &SimilarReport {
                label: page.similar.label,
                titles: &similar,
            },
        );

        assert!(text.starts_with("Arcane\nAnimation · Action & Adventure\n"));
        assert!(text.contains("Sisters on opposite sides of a war."));
        assert!(!text.contains("[show more]"));
        assert!(text.contains("Cast: Hailee Steinfeld as Vi"));
        assert!(text.contains("Episodes: Episode 1, Episode 2"));
        assert!(text.contains("Similar series:\n  Game of Thrones (2011) ★ 8.4"));
    }

    #[test]
    fn test_format_page_collapsed_overview() {
        let rec = record(&"w".repeat(300));
        let view = DetailView::new(RouteKey::new("tv", ShowId::Numeric(94605)));
        let DetailRender::Page(page) = view.on_status_change(&FetchStatus::Ready(&rec)) else {
            panic!("Expected page");
        };
        assert_eq!(view.overview_state(), OverviewState::Collapsed);

        let text = format_page(
            &page,
            &SimilarReport {
                label: page.similar.label,
                titles: &[],
            },
        );
        assert!(text.contains(&format!("{}... [show more]", "w".repeat(280))));
        assert!(!text.contains("Similar series"));
    }

    #[test]
    fn test_report_json_shape() {
        let rec = record("Short.");
        let view = DetailView::new(RouteKey::new("tv", ShowId::Numeric(94605)));
        let similar = titles();
        let report = InfoReport {
            route: "/tv/94605".into(),
            document_title: "Arcane".into(),
            render: view.on_status_change(&FetchStatus::Ready(&rec)),
            similar: SimilarReport {
                label: "Similar series",
                titles: &similar,
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"], "page");
        assert_eq!(json["page"]["title"], "Arcane");
        assert_eq!(json["page"]["overview"], "Short.");
        assert!(json["page"]["overview_toggle"].is_null());
        assert_eq!(json["page"]["episodes"][7], "Episode 22");
        assert_eq!(
            json["page"]["trailer_url"],
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
        assert_eq!(json["page"]["backdrop"]["position"], "top");
        assert!(json["page"]["backdrop"]["image_url"].is_null());
        assert_eq!(json["similar"]["titles"][0]["id"], 1399);
        assert_eq!(json["document_title"], "Arcane");
    }
}
