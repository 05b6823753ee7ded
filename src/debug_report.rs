use vyakarana::{ClassificationVerbose, Registry, StepOutcome};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(res: &ClassificationVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let token = &res.trace.token;
    let script = match token.script() {
        Some(s) if token.is_mixed() => format!("{}, mixed", s.name()),
        Some(s) => s.name().to_string(),
        None => "invalid".to_string(),
    };
    println!(
        "\n{} {}",
        palette.bold(palette.paint(format!("⚙  Classifying: \"{}\" → {}", res.text, token), ansi::CYAN)),
        palette.dim(format!("({script})"))
    );

    // Chain walk
    println!(
        "\n{}",
        palette.paint(format!("━━━ {} ({}) ━━━", res.trace.family, res.trace.strategy), ansi::GRAY)
    );
    print_steps(res, &palette);

    // Result
    println!("\n{}", palette.paint("━━━ Result ━━━", ansi::GRAY));
    print_result(res, &palette);

    // Timing
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let m = &res.metrics;
    println!(
        "  Total: {}  │  Normalize: {}  │  Evaluate: {}  │  Report: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.dim(format!("{:?}", m.normalize)),
        palette.paint(format!("{:?}", m.evaluate), ansi::CYAN),
        palette.dim(format!("{:?}", m.report)),
    );
    println!(
        "  Predicates: {} evaluated, {} failed, {} skipped",
        m.predicates_evaluated, m.predicates_failed, m.predicates_skipped
    );
    println!();
}

fn print_steps(res: &ClassificationVerbose, palette: &ansi::Palette) {
    if res.trace.steps.is_empty() {
        println!("{}", palette.dim("  No predicates evaluated"));
        return;
    }

    for (idx, step) in res.trace.steps.iter().enumerate() {
        let (mark, detail) = match &step.outcome {
            StepOutcome::NoOpinion => (palette.dim("·"), palette.dim("no opinion")),
            StepOutcome::Decisive(v) if v.applies => (
                palette.paint("✓", ansi::GREEN),
                format!("{} {}", v.reason, palette.dim(format!("({:.2})", v.confidence))),
            ),
            StepOutcome::Decisive(v) => (
                palette.paint("✗", ansi::YELLOW),
                format!("{} {}", v.reason, palette.dim(format!("({:.2})", v.confidence))),
            ),
            StepOutcome::Modifier(e) => (palette.paint("±", ansi::BLUE), e.to_string()),
            StepOutcome::Failed(msg) => (palette.paint("!", ansi::RED), palette.paint(msg, ansi::RED)),
        };
        println!(
            "  {} {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            mark,
            palette.paint(step.rule_id, ansi::CYAN),
            detail
        );
    }
    if res.trace.skipped() > 0 {
        println!("  {}", palette.dim(format!("... {} rules not reached", res.trace.skipped())));
    }
}

fn print_result(res: &ClassificationVerbose, palette: &ansi::Palette) {
    let r = &res.result;
    let applies =
        if r.applies { palette.paint("applies", ansi::GREEN) } else { palette.paint("does not apply", ansi::YELLOW) };
    println!("  {} {} {:.2}", palette.bold(applies), palette.dim("│ confidence:"), r.confidence);
    if !r.fired_rule_ids.is_empty() {
        println!("  {} {}", palette.dim("fired:"), palette.paint(r.fired_rule_ids.join(", "), ansi::CYAN));
    }
    if !r.effects.is_empty() {
        println!(
            "  {} {} {}",
            palette.dim("effects:"),
            palette.paint(r.effects.to_string(), ansi::BLUE),
            palette.dim(format!("(from {})", r.modified_by.join(", ")))
        );
    }
    if !r.applies {
        for reason in &r.reasons {
            println!("    {}", palette.dim(reason));
        }
    }
}

pub fn print_chains(registry: &Registry, color: bool) {
    let palette = ansi::Palette::new(color);
    for chain in registry.families() {
        println!(
            "\n{} {}",
            palette.bold(palette.paint(chain.name(), ansi::CYAN)),
            palette.dim(format!("({}, {} rules)", chain.strategy(), chain.len()))
        );
        for rule in chain.rules() {
            println!(
                "  {} {}  {}",
                palette.paint(format!("{:<14}", rule.id), ansi::BLUE),
                rule.summary,
                palette.dim(format!("[{}]", rule.context_keys.join(", ")))
            );
        }
    }
    println!();
}
