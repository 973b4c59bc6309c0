use crate::load::{read_yaml, CARDS_FILE, CONFIG_FILE};
use serde_yaml::Value;
use std::path::Path;
use wretched_core::{CardCatalog, CardDef, CardId, GameConfig, Rank, Suit};

// `ui` only styles rendered output; it is accepted and ignored.
const REQUIRED_CONFIG_FIELDS: [&str; 3] = ["game", "mechanics", "conditions"];
const REQUIRED_GAME_FIELDS: [&str; 2] = ["title", "author"];
const REQUIRED_CARD_FIELDS: [&str; 2] = ["title", "description"];

/// Every problem in a game directory, in reading order. Empty means the game
/// loads.
pub fn validate_game_dir(dir: &Path) -> Vec<String> {
    let mut problems = Vec::new();
    match read_yaml(&dir.join(CONFIG_FILE)) {
        Ok(value) => problems.extend(read_config(&value).1),
        Err(err) => problems.push(format!("{CONFIG_FILE}: {err:#}")),
    }
    match read_yaml(&dir.join(CARDS_FILE)) {
        Ok(value) => problems.extend(read_catalog(&value).1),
        Err(err) => problems.push(format!("{CARDS_FILE}: {err:#}")),
    }
    problems
}

/// Shape checks first, then typed decoding and the numeric rules.
pub fn read_config(value: &Value) -> (Option<GameConfig>, Vec<String>) {
    let mut problems = Vec::new();
    if !value.is_mapping() {
        problems.push("Config must be a mapping".to_string());
        return (None, problems);
    }
    for field in REQUIRED_CONFIG_FIELDS {
        if value.get(field).is_none() {
            problems.push(format!("Missing required config field: {field}"));
        }
    }
    if let Some(game) = value.get("game") {
        for field in REQUIRED_GAME_FIELDS {
            if game.get(field).is_none() {
                problems.push(format!("Missing required game field: {field}"));
            }
        }
    }
    if !problems.is_empty() {
        return (None, problems);
    }

    let config: GameConfig = match serde_yaml::from_value(value.clone()) {
        Ok(config) => config,
        Err(err) => {
            problems.push(format!("Invalid config: {err}"));
            return (None, problems);
        }
    };
    let thresholds = config.thresholds();
    if thresholds.danger <= thresholds.critical {
        problems.push(format!(
            "Stability danger threshold ({}) must be greater than critical ({})",
            thresholds.danger, thresholds.critical
        ));
    }
    if config.mechanics.tokens.initial <= 0 {
        problems.push("Initial tokens must be greater than 0".to_string());
    }
    if config.mechanics.stability.initial == 0 {
        problems.push("Initial stability must be greater than 0".to_string());
    }
    if problems.is_empty() {
        (Some(config), problems)
    } else {
        (None, problems)
    }
}

/// Walks `suit -> rank -> card`, collecting every card that decodes and a
/// message for everything that does not.
pub fn read_catalog(value: &Value) -> (CardCatalog, Vec<String>) {
    let mut problems = Vec::new();
    let mut entries = Vec::new();
    let Some(suits) = value.as_mapping() else {
        problems.push("Cards must be a mapping of suits".to_string());
        return (CardCatalog::default(), problems);
    };

    for (key, _) in suits {
        match key_text(key) {
            Some(text) if Suit::from_key(&text).is_some() => {}
            Some(text) => problems.push(format!("Unknown suit: {text}")),
            None => problems.push("Suit keys must be strings".to_string()),
        }
    }

    for suit in Suit::ALL {
        let Some(ranks) = lookup(value, suit.key()) else {
            problems.push(format!("Missing suit: {}", suit.key()));
            continue;
        };
        if let Some(mapping) = ranks.as_mapping() {
            for (key, _) in mapping {
                let text = key_text(key).unwrap_or_default();
                if Rank::from_key(&text).is_none() {
                    problems.push(format!("Unknown card: {text} of {}", suit.key()));
                }
            }
        }
        for rank in Rank::ALL {
            let id = CardId::new(suit, rank);
            let Some(card) = lookup(ranks, rank.key()) else {
                problems.push(format!("Missing card: {} of {}", rank.key(), suit.key()));
                continue;
            };
            match read_card(card, id) {
                Ok(def) => entries.push((id, def)),
                Err(mut card_problems) => problems.append(&mut card_problems),
            }
        }
    }
    (CardCatalog::from_entries(entries), problems)
}

fn read_card(card: &Value, id: CardId) -> Result<CardDef, Vec<String>> {
    let (rank, suit) = (id.rank.key(), id.suit.key());
    if !card.is_mapping() {
        return Err(vec![format!("Invalid card data for {rank} of {suit}")]);
    }
    let mut problems: Vec<String> = REQUIRED_CARD_FIELDS
        .iter()
        .filter(|field| card.get(**field).is_none())
        .map(|field| format!("Card {rank} of {suit} missing required field: {field}"))
        .collect();
    if let Some(tokens) = card.get("tokens") {
        if tokens.as_i64().is_none() {
            problems.push(format!("Card {rank} of {suit} has non-integer tokens"));
        }
    }
    if let Some(blocks) = card.get("blocks") {
        if blocks.as_u64().map_or(true, |count| count > u64::from(u32::MAX)) {
            problems.push(format!(
                "Card {rank} of {suit} blocks must be a non-negative integer"
            ));
        }
    }
    if !problems.is_empty() {
        return Err(problems);
    }
    serde_yaml::from_value(card.clone())
        .map_err(|err| vec![format!("Invalid card data for {rank} of {suit}: {err}")])
}

/// Keys may be authored as strings or bare integers (`10:` vs `"10":`) and
/// in any case.
fn lookup<'a>(mapping: &'a Value, wanted: &str) -> Option<&'a Value> {
    mapping.as_mapping()?.iter().find_map(|(key, value)| {
        key_text(key)
            .filter(|text| text.trim().eq_ignore_ascii_case(wanted))
            .map(|_| value)
    })
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(body: &str) -> Value {
        serde_yaml::from_str(body).expect("yaml")
    }

    #[test]
    fn reports_missing_config_fields() {
        let (config, problems) = read_config(&yaml("game:\n  title: Alone\nmechanics: {}\n"));
        assert!(config.is_none());
        assert_eq!(
            problems,
            vec![
                "Missing required config field: conditions".to_string(),
                "Missing required game field: author".to_string(),
            ]
        );
    }

    #[test]
    fn ui_block_is_optional() {
        let body = r#"
game: { title: Alone, author: Me }
mechanics:
  tokens: { name: Hope, initial: 5 }
  stability: { name: Tower, initial: 10 }
conditions: {}
"#;
        let (config, problems) = read_config(&yaml(body));
        assert!(problems.is_empty(), "{problems:?}");
        assert!(config.is_some());

        let themed = format!("{body}ui:\n  theme: dark\n  show_history: true\n");
        let (config, problems) = read_config(&yaml(&themed));
        assert!(problems.is_empty(), "{problems:?}");
        assert_eq!(
            config.map(|config| config.mechanics.stability.thresholds),
            Some(Default::default())
        );
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let body = r#"
game: { title: Alone, author: Me }
mechanics:
  tokens: { name: Hope, initial: 5 }
  stability: { name: Tower, initial: 10, thresholds: { danger: 2, critical: 4 } }
conditions: {}
"#;
        let (config, problems) = read_config(&yaml(body));
        assert!(config.is_none());
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("danger threshold (2)"));
    }

    #[test]
    fn card_problems_are_specific() {
        let body = r#"
spades:
  A: { title: Ace }
  K: "just text"
  Z: { title: x, description: y }
  10: { title: Ten, description: d, blocks: -1 }
"#;
        let (catalog, problems) = read_catalog(&yaml(body));
        assert!(catalog.is_empty());
        assert!(problems.contains(&"Unknown card: Z of spades".to_string()));
        assert!(problems.contains(&"Card A of spades missing required field: description".to_string()));
        assert!(problems.contains(&"Invalid card data for K of spades".to_string()));
        assert!(problems.contains(&"Card 10 of spades blocks must be a non-negative integer".to_string()));
        assert!(problems.contains(&"Missing card: Q of spades".to_string()));
        assert!(problems.contains(&"Missing suit: hearts".to_string()));
    }

    #[test]
    fn integer_rank_keys_are_accepted() {
        let body = "hearts:\n  9: { title: Nine, description: d, tokens: -2, blocks: 1 }\n";
        let (catalog, _) = read_catalog(&yaml(body));
        let def = catalog
            .get(CardId::new(Suit::Hearts, Rank::Nine))
            .expect("nine of hearts");
        assert_eq!(def.token_delta, -2);
        assert_eq!(def.block_pulls, 1);
    }
}
