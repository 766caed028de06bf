//! Crisis Sim - Entry Point
//!
//! Terminal front-end for the crisis simulation: pick a scenario, assemble
//! a team under the cost ceiling, then play decision rounds until the
//! session reaches a terminal state.

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crisis_sim::core::config::SimulationSettings;
use crisis_sim::core::error::{Result, SimError};
use crisis_sim::engine::loader;
use crisis_sim::protocol::ScenarioSummary;
use crisis_sim::roster::{Roster, TeamSelection};
use crisis_sim::server::{LocalServer, RemoteServer, ScenarioServer};
use crisis_sim::session::presenter::{EMPTY_PLACEHOLDER, FINISHED_PLACEHOLDER};
use crisis_sim::session::{SessionController, StageView, StatusBoard};

/// Crisis simulation terminal client
#[derive(Parser, Debug)]
#[command(name = "crisis-sim")]
#[command(about = "Run a crisis simulation session from the terminal")]
struct Args {
    /// Scenario id to run (interactive chooser when omitted)
    #[arg(long)]
    scenario: Option<String>,

    /// List available scenarios and exit
    #[arg(long, default_value_t = false)]
    list_scenarios: bool,

    /// Auto-select the first three roster members
    #[arg(long, default_value_t = false)]
    auto_team: bool,

    /// Base URL of a remote scenario server (in-process engine when omitted)
    #[arg(long)]
    server: Option<String>,

    /// Directory of scenario and roster data files (in-process engine only)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Random seed for reproducible runs (in-process engine only)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("crisis_sim=info")
        .init();

    let args = Args::parse();
    let settings = SimulationSettings::new();
    settings.validate().map_err(SimError::InvalidSettings)?;

    let rt = Runtime::new()?;

    let server: Box<dyn ScenarioServer> = match &args.server {
        Some(base_url) => {
            tracing::info!(server = %base_url, "using remote scenario server");
            Box::new(RemoteServer::new(base_url.clone())?)
        }
        None => {
            let scenarios = loader::load_scenarios(&args.data_dir)?;
            let roster = loader::load_roster(&args.data_dir, settings.team_budget);
            let mut local = LocalServer::new(scenarios, roster, settings);
            if let Some(seed) = args.seed {
                local = local.with_seed(seed);
            }
            Box::new(local)
        }
    };

    let scenarios = rt.block_on(server.list_scenarios())?;
    if args.list_scenarios {
        println!("Available scenarios:");
        for scenario in &scenarios {
            println!("- {}: {}", scenario.id, scenario.name);
        }
        return Ok(());
    }

    // Roster load failure degrades to an empty roster panel.
    let roster = match rt.block_on(server.fetch_roster()) {
        Ok(response) => Roster::from(response),
        Err(err) => {
            tracing::warn!(error = %err, "failed to load roster");
            Roster::empty()
        }
    };

    let scenario_id = match choose_scenario(&scenarios, args.scenario.as_deref())? {
        Some(id) => id,
        None => return Ok(()),
    };
    let team = choose_team(&roster, args.auto_team)?;

    run_session(&rt, &*server, &roster, &scenario_id, team)
}

/// Pick a scenario by flag or interactively
fn choose_scenario(
    scenarios: &[ScenarioSummary],
    chosen: Option<&str>,
) -> Result<Option<String>> {
    if let Some(id) = chosen {
        if scenarios.iter().any(|scenario| scenario.id == id) {
            return Ok(Some(id.to_string()));
        }
        println!("Scenario '{id}' not found.");
        return Ok(None);
    }

    if scenarios.is_empty() {
        println!("No scenarios available.");
        return Ok(None);
    }

    println!("Available scenarios:");
    for (index, scenario) in scenarios.iter().enumerate() {
        let briefing: String = scenario.briefing.chars().take(60).collect();
        println!("{}. {} ({}) - {}", index + 1, scenario.name, scenario.id, briefing);
    }
    let selection = prompt("Choose scenario number: ")?;
    match selection.parse::<usize>() {
        Ok(number) if number >= 1 && number <= scenarios.len() => {
            Ok(Some(scenarios[number - 1].id.clone()))
        }
        _ => {
            println!("Invalid selection.");
            Ok(None)
        }
    }
}

/// Pick a team by numbers, looping until the selection fits the budget or
/// the player confirms an over-budget pick
fn choose_team(roster: &Roster, auto: bool) -> Result<TeamSelection> {
    let mut team = TeamSelection::new();
    if roster.is_empty() {
        println!("Roster is empty; starting without a team.");
        return Ok(team);
    }

    if auto {
        for member in roster.members().iter().take(3) {
            team.select(&member.name);
        }
        return Ok(team);
    }

    loop {
        team.clear();
        println!("Available roster (choose by number, comma-separated):");
        for (index, member) in roster.members().iter().enumerate() {
            println!(
                "{}. {} ({}) - Cost:{} | A:{} C:{} E:{} L:{}",
                index + 1,
                member.name,
                member.role,
                member.cost,
                member.stats.analysis,
                member.stats.comms,
                member.stats.engineering,
                member.stats.leadership,
            );
        }
        let selection = prompt("Enter numbers (comma) or press Enter for default (first 3): ")?;
        if selection.is_empty() {
            for member in roster.members().iter().take(3) {
                team.select(&member.name);
            }
        } else {
            for part in selection.split(',').map(str::trim).filter(|part| !part.is_empty()) {
                match part.parse::<usize>() {
                    Ok(number) if number >= 1 && number <= roster.len() => {
                        team.select(&roster.members()[number - 1].name);
                    }
                    _ => println!("Warning: '{part}' is not a valid number; skipping"),
                }
            }
            if team.is_empty() {
                println!("No valid team selected; using default.");
                for member in roster.members().iter().take(3) {
                    team.select(&member.name);
                }
            }
        }

        let summary = team.summary(roster);
        if !summary.over_budget {
            return Ok(team);
        }
        println!(
            "\nWarning: selected team cost {} exceeds budget {}.",
            summary.total_cost, summary.budget
        );
        let response = prompt("Enter 'r' to reselect team, 'c' to confirm and proceed anyway: ")?;
        match response.to_lowercase().as_str() {
            "c" => return Ok(team),
            "r" => continue,
            _ => println!("Invalid response; reselecting."),
        }
    }
}

/// Play one session to its terminal state
fn run_session(
    rt: &Runtime,
    server: &dyn ScenarioServer,
    roster: &Roster,
    scenario_id: &str,
    team: TeamSelection,
) -> Result<()> {
    let mut controller = SessionController::new();
    if let Err(err) = rt.block_on(controller.start(server, scenario_id, &team, roster)) {
        println!("Unable to launch session: {err}");
        return Ok(());
    }

    loop {
        let Some(view) = controller.presenter().view() else {
            println!("{EMPTY_PLACEHOLDER}");
            break;
        };
        render_stage(view);

        let options: Vec<String> = view
            .challenges
            .iter()
            .flat_map(|challenge| challenge.options.iter())
            .map(|option| option.id.clone())
            .collect();

        let choice = prompt("Choose option number (or 'q' to quit): ")?;
        if matches!(choice.to_lowercase().as_str(), "q" | "quit" | "exit") {
            println!("Exiting game.");
            return Ok(());
        }
        let option_id = match choice.parse::<usize>() {
            Ok(number) if number >= 1 && number <= options.len() => &options[number - 1],
            _ => {
                println!("Invalid choice; try again.");
                continue;
            }
        };

        match rt.block_on(controller.submit_decision(server, option_id)) {
            Ok(report) => {
                if let Some(outcome) = &report.outcome {
                    println!("\nOutcome: {outcome}");
                }
                print_status(controller.status());
                if report.finished {
                    break;
                }
            }
            Err(err) => {
                println!("Error applying decision: {err}");
                // Recoverable: the stage is re-enabled for another try.
            }
        }
    }

    print_summary(&controller);
    Ok(())
}

fn render_stage(view: &StageView) {
    let marker = if view.is_injection { " [Injection]" } else { "" };
    println!("\n== {}{} ==", view.title, marker);
    if !view.summary.is_empty() {
        println!("{}", view.summary);
    }
    for challenge in &view.challenges {
        println!("\n{}\n{}\n", challenge.title, challenge.prompt);
        for (index, option) in challenge.options.iter().enumerate() {
            println!(
                "{}. {} (skill: {} | difficulty: {} | chance: {})",
                index + 1,
                option.label,
                option.skill,
                option.difficulty,
                option.probability_label(),
            );
            if !option.narrative.is_empty() {
                println!("   {}", option.narrative);
            }
        }
    }
}

fn print_status(status: &StatusBoard) {
    println!("\n--- Current State ---");
    println!("Budget: {}", status.budget);
    println!("Reputation: {}", status.reputation);
    println!("Risk: {}", status.risk);
    println!(
        "Team   A:{} C:{} E:{} L:{}",
        status.team_totals.analysis,
        status.team_totals.comms,
        status.team_totals.engineering,
        status.team_totals.leadership,
    );
    println!("---------------------");
}

fn print_summary(controller: &SessionController) {
    let status = controller.status();
    if status.budget <= 0 || status.reputation <= 0 {
        print_fired_banner(status);
    } else {
        println!("\n=== Scenario Complete ===");
        println!("Final Budget: {}", status.budget);
        println!("Final Reputation: {}", status.reputation);
        println!("Final Risk: {}", status.risk);
    }

    println!("\nGame History:");
    for entry in controller.ledger().oldest_first() {
        println!(
            "- Stage: {} | Option: {} -> {}",
            entry.stage, entry.option, entry.outcome
        );
    }
    println!("\n{FINISHED_PLACEHOLDER}");
}

/// Banner shown when the crisis ends your tenure
fn print_fired_banner(status: &StatusBoard) {
    println!("\n{}", "=".repeat(70));
    println!("{}", "█".repeat(70));
    println!("║{}║", " ".repeat(68));
    println!("║{}║", center("YOU HAVE BEEN FIRED", 68));
    println!("║{}║", " ".repeat(68));
    println!("{}", "█".repeat(70));
    println!("{}", "=".repeat(70));
    println!("\nFinal State:");
    println!("  Budget: {}", status.budget);
    println!("  Reputation: {}", status.reputation);
    println!("  Risk: {}", status.risk);
}

fn center(text: &str, width: usize) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let left = (width - text.len()) / 2;
    let right = width - text.len() - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn prompt(text: &str) -> io::Result<String> {
    print!("{text}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
