use wretched_core::{CardCatalog, CardId, Event, GameStatus, GameView, RiskBand, TurnPhase};
use wretched_data::GameSummary;

const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const CYAN: &str = "\x1b[96m";
const YELLOW: &str = "\x1b[93m";
const RED: &str = "\x1b[91m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// ANSI styling, switched off for `--no-color` and non-terminal output.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, msg: &str) -> String {
        format!("{} {msg}", self.paint(GREEN, "✓"))
    }

    pub fn error(&self, msg: &str) -> String {
        format!("{} {msg}", self.paint(RED, "✗"))
    }

    pub fn info(&self, msg: &str) -> String {
        format!("{} {msg}", self.paint(BLUE, "ℹ"))
    }

    pub fn warning(&self, msg: &str) -> String {
        format!("{} {msg}", self.paint(YELLOW, "⚠"))
    }

    pub fn bullet(&self, msg: &str) -> String {
        format!("  {} {msg}", self.paint(CYAN, "•"))
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn band(&self, band: RiskBand, text: &str) -> String {
        match band {
            RiskBand::Safe => self.paint(GREEN, text),
            RiskBand::Danger => self.paint(YELLOW, text),
            RiskBand::Critical => self.paint(RED, text),
        }
    }
}

pub fn card_label(card: CardId) -> String {
    format!("{}{}", card.rank.key(), card.suit.symbol())
}

fn card_title(card: CardId, catalog: &CardCatalog) -> String {
    match catalog.get(card) {
        Some(def) => format!("{} {}", card_label(card), def.title),
        None => card_label(card),
    }
}

/// One line per event, or `None` for events the status block already shows.
pub fn format_event(event: &Event, catalog: &CardCatalog) -> Option<String> {
    let line = match event {
        Event::GameStarted { deck } => format!("new game: {deck} cards shuffled"),
        Event::GameRestored { deck, status } => {
            format!("save restored: {deck} cards left, {status:?}")
        }
        Event::Reshuffled { deck } => format!("deck reshuffled: {deck} cards"),
        Event::TurnRolled { number, roll } => {
            format!("turn {number}: rolled {roll}, play {roll} card(s)")
        }
        Event::TurnEnded { number } => format!("turn {number} is over"),
        Event::CardDrawn { card, remaining } => {
            format!("drew {} ({remaining} left)", card_title(*card, catalog))
        }
        Event::CardApplied { card, .. } => format!("applied {}", card_title(*card, catalog)),
        Event::TokensChanged { from, to } => format!("tokens {from} -> {to}"),
        Event::BlockPulled {
            stability_before,
            threshold,
            rolls,
            lost,
        } => {
            let faces: Vec<String> = rolls.iter().map(u8::to_string).collect();
            format!(
                "pulled a block from {stability_before}: rolled [{}] failing on <= {threshold}, lost {lost}",
                faces.join(" ")
            )
        }
        Event::StabilityChanged { from, to } => format!("stability {from} -> {to}"),
        Event::GameEnded { .. } => return None,
        Event::JournalSaved { chars } => format!("journal saved ({chars} chars)"),
    };
    Some(line)
}

pub fn format_view(view: &GameView, style: &Style) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{}: {}   {}: {}/{} {}   deck: {}",
        view.tokens_name,
        view.tokens,
        view.stability_name,
        view.stability,
        view.stability_initial,
        style.band(view.risk, &format!("[{:?}]", view.risk).to_lowercase()),
        view.deck_remaining
    ));
    if let Some(turn) = view.turn.filter(|turn| turn.in_progress()) {
        lines.push(format!(
            "turn {}: {} of {} card(s) left",
            turn.number, turn.remaining, turn.rolled
        ));
    }
    match (&view.pending, view.phase) {
        (Some(pending), TurnPhase::CardRevealed) => {
            lines.push(style.bold(&format!(
                "{} {}",
                card_label(pending.id),
                pending.title
            )));
            lines.push(format!("  {}", pending.description));
            lines.push(format!(
                "  effects: tokens {:+}, block pulls {}  (type 'apply' when done)",
                pending.token_delta, pending.blocks
            ));
        }
        _ => {
            if view.status == GameStatus::Active {
                lines.push("no card in play (type 'roll' or 'draw')".to_string());
            }
        }
    }
    if let Some(message) = &view.message {
        let banner = if view.status.is_win() {
            style.success(message)
        } else {
            style.error(message)
        };
        lines.push(banner);
        lines.push("type 'new' to start again".to_string());
    }
    lines
}

pub fn format_history(view: &GameView) -> Vec<String> {
    if view.history.is_empty() {
        return vec!["no cards applied yet".to_string()];
    }
    view.history
        .iter()
        .enumerate()
        .map(|(idx, card)| format!("{:>2}. {} {}", idx + 1, card_label(card.id), card.title))
        .collect()
}

pub fn format_summary(summary: &GameSummary, style: &Style) -> Vec<String> {
    let rule = "=".repeat(60);
    let mut lines = vec![rule.clone(), style.bold(&format!("Game: {}", summary.title))];
    if let Some(subtitle) = &summary.subtitle {
        lines.push(format!("Subtitle: {subtitle}"));
    }
    lines.push(format!("Author: {}", summary.author));
    if let Some(version) = &summary.version {
        lines.push(format!("Version: {version}"));
    }
    if let Some(description) = &summary.description {
        lines.push(String::new());
        lines.push(description.trim().to_string());
    }
    lines.push(rule);
    lines.push(String::new());
    lines.push(style.bold("Mechanics:"));
    if !summary.systems.is_empty() {
        lines.push(style.bullet(&format!("Systems: {}", summary.systems.join(", "))));
    }
    lines.push(style.bullet(&format!(
        "Tokens: {} (start: {})",
        summary.tokens_name, summary.tokens_initial
    )));
    lines.push(style.bullet(&format!(
        "Stability: {} (start: {}, danger <= {}, critical <= {})",
        summary.stability_name, summary.stability_initial, summary.danger, summary.critical
    )));
    lines.push(style.bullet(&format!(
        "Reshuffle on empty: {}",
        if summary.reshuffle { "yes" } else { "no" }
    )));
    lines.push(String::new());
    let count = format!(
        "Cards defined: {}/{}",
        summary.cards_defined, summary.cards_expected
    );
    lines.push(if summary.is_complete() {
        style.success(&count)
    } else {
        style.warning(&format!("{count} (incomplete)"))
    });
    lines
}
