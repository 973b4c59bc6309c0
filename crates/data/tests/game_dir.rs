use std::fs;
use std::path::{Path, PathBuf};
use wretched_core::{CardId, ConditionKind, GameStatus, Rank, Suit};
use wretched_data::{
    load_catalog_partial, load_game_dir, validate_game_dir, ContentError, GameSummary, CARDS_FILE,
    CONFIG_FILE, STORY_FILE,
};

fn sample_game() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("games")
        .join("lighthouse")
}

fn copy_game(to: &Path) {
    for name in [CONFIG_FILE, CARDS_FILE, STORY_FILE] {
        fs::copy(sample_game().join(name), to.join(name)).expect("copy");
    }
}

#[test]
fn sample_game_loads_completely() {
    let loaded = load_game_dir(&sample_game()).expect("load");
    assert_eq!(loaded.catalog.len(), 52);
    assert!(loaded.catalog.is_complete());
    assert!(loaded.story.as_deref().is_some_and(|story| story.contains("Last Light")));

    let config = &loaded.config;
    assert_eq!(config.mechanics.tokens.name, "Hope");
    assert_eq!(config.mechanics.stability.thresholds.danger, 10);
    assert!(!config.reshuffle());
    assert_eq!(config.conditions.lose[0].kind, ConditionKind::StabilityZero);
    assert!(config
        .message_for(GameStatus::WonByDeckExhaustion)
        .is_some_and(|message| message.contains("relief boat")));

    let ace = loaded
        .catalog
        .get(CardId::new(Suit::Spades, Rank::Ace))
        .expect("ace of spades");
    assert_eq!(ace.block_pulls, 3);
}

#[test]
fn sample_game_validates_clean() {
    assert_eq!(validate_game_dir(&sample_game()), Vec::<String>::new());
}

#[test]
fn summary_counts_cards() {
    let loaded = load_game_dir(&sample_game()).expect("load");
    let summary = GameSummary::from_parts(&loaded.config, &loaded.catalog);
    assert_eq!(summary.title, "The Last Light");
    assert_eq!(summary.systems, vec!["tokens", "stability", "journal"]);
    assert_eq!(summary.stability_initial, 20);
    assert!(summary.is_complete());
}

#[test]
fn missing_card_is_reported_and_blocks_loading() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_game(dir.path());
    let cards = fs::read_to_string(dir.path().join(CARDS_FILE)).expect("read");
    let trimmed: String = cards
        .lines()
        .filter(|line| !line.contains("title: Cold,"))
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(dir.path().join(CARDS_FILE), trimmed).expect("write");

    assert_eq!(
        validate_game_dir(dir.path()),
        vec!["Missing card: 4 of clubs".to_string()]
    );
    let err = load_game_dir(dir.path()).expect_err("incomplete catalog");
    assert!(matches!(
        err.downcast_ref::<ContentError>(),
        Some(ContentError::MalformedCardCatalog(problems)) if problems.len() == 1
    ));

    let partial = load_catalog_partial(dir.path()).expect("partial");
    assert_eq!(partial.len(), 51);
}

#[test]
fn missing_files_are_problems_not_panics() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(sample_game().join(CARDS_FILE), dir.path().join(CARDS_FILE)).expect("copy");
    let problems = validate_game_dir(dir.path());
    assert_eq!(problems.len(), 1);
    assert!(problems[0].starts_with("config.yaml: read"));
    assert!(load_game_dir(dir.path()).is_err());
}

#[test]
fn story_is_optional() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_game(dir.path());
    fs::remove_file(dir.path().join(STORY_FILE)).expect("remove");
    let loaded = load_game_dir(dir.path()).expect("load");
    assert!(loaded.story.is_none());
}

#[test]
fn malformed_config_surfaces_typed_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    copy_game(dir.path());
    fs::write(
        dir.path().join(CONFIG_FILE),
        "game: { title: Broken }\nmechanics: {}\n",
    )
    .expect("write");
    let err = load_game_dir(dir.path()).expect_err("bad config");
    match err.downcast_ref::<ContentError>() {
        Some(ContentError::MalformedConfiguration(problems)) => {
            assert!(problems.contains(&"Missing required config field: conditions".to_string()));
            assert!(problems.contains(&"Missing required game field: author".to_string()));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
