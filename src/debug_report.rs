use metarobots::{DirectiveType, Resolution, RuleOutcome, Value, rule_names};
use std::fmt::Display;

/// What a piece of report text is, which decides how it is colored.
#[derive(Debug, Clone, Copy)]
enum Tone {
    Title,
    Section,
    Directive,
    Rule,
    Applied,
    Clear,
    Budget,
    Marker,
    Muted,
}

impl Tone {
    fn sgr(self) -> &'static str {
        match self {
            Tone::Title => "1;36",
            Tone::Section | Tone::Muted => "90",
            Tone::Directive => "34",
            Tone::Rule => "36",
            Tone::Applied => "1;31",
            Tone::Clear => "32",
            Tone::Budget => "33",
            Tone::Marker => "1;33",
        }
    }
}

struct Styler {
    color: bool,
}

impl Styler {
    fn new(color: bool) -> Self {
        Self { color }
    }

    fn tone(&self, tone: Tone, text: impl Display) -> String {
        if self.color { format!("\x1b[{}m{}\x1b[0m", tone.sgr(), text) } else { text.to_string() }
    }

    fn section(&self, title: &str) {
        println!("\n{}", self.tone(Tone::Section, format!("━━━ {} ━━━", title)));
    }

    fn value(&self, value: Value) -> String {
        match (value.as_bool(), value.as_int()) {
            (Some(true), _) => self.tone(Tone::Applied, value),
            (Some(false), _) => self.tone(Tone::Clear, value),
            (None, Some(limit)) => self.tone(Tone::Budget, limit),
            (None, None) => value.to_string(),
        }
    }
}

pub fn print_run(subject: &str, resolution: &Resolution, color: bool) {
    let styler = Styler::new(color);
    println!("\n{}", styler.tone(Tone::Title, format!("⚙  Resolving: {}", subject)));

    styler.section("Directives");
    if resolution.directives.is_empty() {
        println!("  {}", styler.tone(Tone::Muted, "No directives produced"));
    }
    for (directive, value) in &resolution.directives {
        println!("  {:<18} {}", styler.tone(Tone::Directive, directive), styler.value(*value));
    }

    // Requested, but nothing emitted.
    let absent: Vec<&str> = resolution
        .assertions
        .iter()
        .map(|(directive, _)| directive)
        .filter(|directive| !resolution.directives.contains_key(directive))
        .map(DirectiveType::as_str)
        .collect();
    if !absent.is_empty() {
        println!("  {}", styler.tone(Tone::Muted, format!("absent: {}", absent.join(", "))));
    }

    styler.section("Assertions");
    if resolution.assertions.is_empty() {
        println!("  {}", styler.tone(Tone::Muted, "No rules fired"));
    }
    for (directive, outcomes) in resolution.assertions.iter() {
        print_trail(&styler, directive, outcomes, resolution);
    }

    styler.section("Timing");
    println!("  Total: {}", styler.tone(Tone::Clear, format!("{:?}", resolution.elapsed)));
    println!();
}

fn print_trail(styler: &Styler, directive: DirectiveType, outcomes: &[RuleOutcome], resolution: &Resolution) {
    println!("  {}", styler.tone(Tone::Directive, directive));
    if outcomes.is_empty() {
        println!("    {}", styler.tone(Tone::Muted, "(no rule fired)"));
        return;
    }

    let decisive = resolution.assertions.decisive(directive);
    for outcome in outcomes {
        let marker = if decisive == Some(outcome) {
            styler.tone(Tone::Marker, "◆")
        } else {
            styler.tone(Tone::Muted, "·")
        };
        println!(
            "    {} {} {} {}",
            marker,
            styler.tone(Tone::Rule, &outcome.rule_name),
            styler.tone(Tone::Muted, "→"),
            styler.value(outcome.value)
        );
    }
}

pub fn print_rules(color: bool) {
    let styler = Styler::new(color);
    styler.section("Rule chains");
    for directive in DirectiveType::ALL {
        println!("  {}", styler.tone(Tone::Directive, directive));
        for (idx, name) in rule_names(directive).into_iter().enumerate() {
            println!("    {} {}", styler.tone(Tone::Muted, format!("[{}]", idx)), styler.tone(Tone::Rule, name));
        }
    }
    println!();
}
