//! Binary entry point for `health-triage`.
//!
//! This module provides the command-line interface for health-triage with options
//! for configuration file paths and logging verbosity. The triage and reference
//! commands run entirely offline; `chat`, `history`, `profile`, the metrics log, and
//! appointment requests start the runtime.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use health_triage::{
    base::{
        config::Config,
        prompts,
        types::{AppointmentKind, ChatError, MetricKind, ProfileUpdate, Res, SugarTiming, Void},
    },
    interaction::{
        appointment::AppointmentScheduler,
        assessment,
        metrics::ReadingDraft,
        symptom_check::{CheckOutcome, SymptomCheck},
    },
    reference::{self, education::EMERGENCY_COMBINATION_ACTIONS, record::RECORD_FOOTER},
    triage::{SelectedSymptomSet, catalog},
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Health-triage – a symptom checker and health assistant.
///
/// Configuration can come from `config.toml` or environment variables
/// prefixed with `HEALTH_TRIAGE_`.
#[derive(Parser, Debug)]
#[command(version, author, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the config is read from `.hidden/config.toml`
    /// in the current directory, if present.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: WARN level
    /// - -v: INFO level
    /// - -vv: DEBUG level
    /// - -vvv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP (HTTP) in addition to logging them.
    #[arg(long)]
    otlp: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the symptom catalog.
    Symptoms,
    /// Assess how urgently the given symptoms need care.
    Triage {
        /// Symptom identifiers (see `symptoms`).
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Look up possible conditions for the given symptoms.
    Diagnose {
        /// Symptom identifiers (see `symptoms`).
        #[arg(required = true)]
        symptoms: Vec<String>,
        /// Additional information (onset, recent events, ...).
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Search medication information by name.
    Medication { query: String },
    /// Lifestyle and diet tips for a condition.
    Lifestyle { condition: String },
    /// List health education topics.
    Topics,
    /// First-aid guidance for an emergency scenario (lists scenarios when omitted).
    Emergency { id: Option<String> },
    /// Ask the health assistant a question.
    Chat {
        message: String,
        /// Opaque user id the history is stored under.
        #[arg(short, long, default_value = "guest")]
        user: String,
    },
    /// Show stored chat history.
    History {
        #[arg(short, long, default_value = "guest")]
        user: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show, or update, a profile.
    Profile {
        #[arg(short, long, default_value = "guest")]
        user: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Record a health metric reading.
    Log {
        #[command(subcommand)]
        reading: ReadingCommand,
        #[arg(short, long, default_value = "guest")]
        user: String,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Show recorded health metric readings.
    Readings {
        #[arg(short, long, default_value = "guest")]
        user: String,
        /// `blood_pressure`, `blood_sugar`, or `weight` (all when omitted).
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List the specialties and time slots appointments can be requested for.
    Specialties,
    /// Request an appointment.
    Book {
        /// Specialty id (see `specialties`).
        specialty: String,
        /// Date as `YYYY-MM-DD`; today or later.
        date: String,
        /// Time slot, e.g. `9:30 AM`.
        time: String,
        #[arg(short, long)]
        reason: Option<String>,
        /// A follow-up rather than a new-patient visit.
        #[arg(long)]
        follow_up: bool,
        #[arg(short, long, default_value = "guest")]
        user: String,
    },
    /// Show requested appointments.
    Appointments {
        #[arg(short, long, default_value = "guest")]
        user: String,
    },
    /// Show the sample health record summary.
    Record,
}

#[derive(Subcommand, Debug)]
enum ReadingCommand {
    /// Blood pressure in mmHg.
    BloodPressure { systolic: u16, diastolic: u16 },
    /// Blood sugar in mg/dL.
    BloodSugar {
        level: u16,
        /// `fasting`, `after_meal`, or `random`.
        #[arg(short, long, default_value = "fasting")]
        timing: String,
    },
    /// Weight in pounds.
    Weight { pounds: f32 },
}

/// Main entry point for the health-triage binary.
///
/// Sets up logging based on verbosity, loads configuration, and runs the command.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("health-triage");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    let config = Config::load(args.config.as_deref())?;

    run(args.command, config).await
}

async fn run(command: Command, config: Config) -> Void {
    match command {
        Command::Symptoms => {
            for symptom in catalog::symptoms() {
                let marker = if symptom.is_emergency() { " (emergency)" } else { "" };
                println!("{:<26} {}{}", symptom.id, symptom.label, marker);
            }
        }
        Command::Triage { symptoms } => {
            let selected = parse_symptoms(&symptoms)?;
            let result = assessment::assess(&selected)?;

            println!("{}", result.severity.headline());
            println!();
            println!("{}", result.advice);
            println!();
            println!("{}", prompts::ASSESSMENT_DISCLAIMER);
        }
        Command::Diagnose { symptoms, note } => {
            let mut check = SymptomCheck::new();

            for id in parse_symptoms(&symptoms)?.iter() {
                check.toggle(id);
            }

            if let Some(note) = note {
                check.set_additional_info(note);
            }

            match check.submit()? {
                CheckOutcome::EmergencyAlert => {
                    println!("Seek Immediate Medical Attention");
                    println!();
                    println!("The combination of chest pain and shortness of breath could indicate a serious medical emergency.");
                    for action in EMERGENCY_COMBINATION_ACTIONS {
                        println!("- {action}");
                    }
                }
                CheckOutcome::Diagnosis(record) => {
                    println!("Possible conditions:");
                    for condition in record.possible_conditions {
                        println!("- {condition}");
                    }
                    println!();
                    println!("Urgency: {}", record.urgency);
                    println!("{}", record.recommendations);
                }
            }
        }
        Command::Medication { query } => match reference::lookup_medication(&query) {
            Some(medication) => {
                println!("{}", medication.name);
                println!();
                println!("Usage: {}", medication.usage);
                println!("Dosage: {}", medication.dosage);
                println!("Side effects: {}", medication.side_effects.join(", "));
                for warning in medication.warnings {
                    println!("Warning: {warning}");
                }
            }
            None => println!("No information found for `{query}`."),
        },
        Command::Lifestyle { condition } => {
            for tip in reference::lifestyle_advice_for(&condition) {
                println!("- {tip}");
            }
        }
        Command::Topics => {
            for topic in reference::health_education_topics() {
                println!("{topic}");
            }
        }
        Command::Emergency { id: None } => {
            for scenario in reference::emergency_scenarios() {
                println!("{:<18} {}", scenario.id, scenario.title);
            }
        }
        Command::Emergency { id: Some(id) } => {
            let guidance = reference::emergency_guidance(&id).ok_or_else(|| anyhow::anyhow!("Unknown emergency scenario `{id}`."))?;

            println!("{}", guidance.title);
            println!();
            println!("{}", guidance.symptoms);
            println!();
            for action in guidance.actions {
                println!("- {action}");
            }
        }
        Command::Chat { message, user } => {
            // Without a key there is nothing to start.
            if let Err(err) = config.credential().require() {
                tracing::warn!("Credential rejected: {err}");
                eprintln!("{}", prompts::CREDENTIAL_PROMPT);
                return Ok(());
            }

            let runtime = health_triage::start(config).await?;

            match runtime.chat(&user, &message).await {
                Ok(reply) => {
                    println!("{}", reply.text);

                    if !reply.history.await.unwrap_or(false) {
                        eprintln!("{}", prompts::HISTORY_NOT_SAVED);
                    }
                }
                Err(ChatError::Credential(reason)) => {
                    tracing::warn!("Credential rejected: {reason}");
                    eprintln!("{}", prompts::CREDENTIAL_PROMPT);
                }
                Err(ChatError::EmptyMessage) => eprintln!("Type a message first."),
                Err(err @ ChatError::Transport(_)) => {
                    tracing::error!("Chat failed: {err}");
                    eprintln!("{}", prompts::TRANSPORT_FAILURE_MESSAGE);
                }
            }
        }
        Command::History { user, limit } => {
            let runtime = health_triage::start(config).await?;

            println!("{}", prompts::WELCOME_MESSAGE);
            for turn in runtime.history(&user, limit).await? {
                println!();
                println!("[{}] you: {}", turn.created_at.format("%Y-%m-%d %H:%M"), turn.user_text);
                println!("assistant: {}", turn.assistant_text);
            }
        }
        Command::Profile { user, full_name, avatar_url } => {
            let runtime = health_triage::start(config).await?;
            let update = ProfileUpdate { full_name, avatar_url };

            let profile = if update.is_empty() {
                runtime.profile(&user).await?
            } else {
                Some(runtime.update_profile(&user, &update).await?)
            };

            match profile {
                Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                None => println!("No profile stored for `{user}`."),
            }
        }
        Command::Log { reading, user, note } => {
            let (kind, draft) = match reading {
                ReadingCommand::BloodPressure { systolic, diastolic } => (
                    MetricKind::BloodPressure,
                    ReadingDraft {
                        systolic: Some(systolic),
                        diastolic: Some(diastolic),
                        ..Default::default()
                    },
                ),
                ReadingCommand::BloodSugar { level, timing } => (
                    MetricKind::BloodSugar,
                    ReadingDraft {
                        level: Some(level),
                        timing: timing.parse::<SugarTiming>()?,
                        ..Default::default()
                    },
                ),
                ReadingCommand::Weight { pounds } => (
                    MetricKind::Weight,
                    ReadingDraft {
                        pounds: Some(pounds),
                        ..Default::default()
                    },
                ),
            };

            let runtime = health_triage::start(config).await?;
            let entry = runtime.record_reading(&user, kind, ReadingDraft { notes: note, ..draft }).await?;

            println!("Recorded {} at {}.", entry.reading, entry.taken_at.format("%Y-%m-%d %H:%M"));
        }
        Command::Readings { user, kind, limit } => {
            let kind = kind.as_deref().map(str::parse::<MetricKind>).transpose()?;
            let runtime = health_triage::start(config).await?;

            for entry in runtime.readings(&user, kind, limit).await? {
                let notes = entry.notes.as_deref().map(|n| format!("  ({n})")).unwrap_or_default();
                println!("[{}] {:<15} {}{}", entry.taken_at.format("%Y-%m-%d %H:%M"), entry.reading.kind().as_str(), entry.reading, notes);
            }
        }
        Command::Specialties => {
            for specialty in reference::specialties() {
                println!("{:<8} {}", specialty.id, specialty.name);
            }
            println!();
            println!("Time slots: {}", reference::time_slots().join(", "));
        }
        Command::Book {
            specialty,
            date,
            time,
            reason,
            follow_up,
            user,
        } => {
            let mut scheduler = AppointmentScheduler::new();

            if follow_up {
                scheduler.set_kind(AppointmentKind::FollowUp);
            }

            scheduler.select_specialty(&specialty)?;
            scheduler.next()?;

            let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|err| anyhow::anyhow!("Invalid date `{date}`: {err}."))?;
            scheduler.select_date(date, chrono::Local::now().date_naive())?;
            scheduler.select_time(&time)?;
            scheduler.next()?;

            if let Some(reason) = reason {
                scheduler.set_reason(reason);
            }

            let request = scheduler.schedule()?;
            let runtime = health_triage::start(config).await?;
            runtime.submit_appointment(&user, &request).await?;

            println!("Appointment request submitted!");
            println!();
            println!("{} on {} at {}", request.specialty.name, request.date.format("%B %-d, %Y"), request.time_slot);
            if !request.reason.is_empty() {
                println!("Reason: {}", request.reason);
            }
        }
        Command::Appointments { user } => {
            let runtime = health_triage::start(config).await?;

            for appointment in runtime.appointments(&user).await? {
                let specialty = reference::specialty(&appointment.specialty_id).map_or(appointment.specialty_id.as_str(), |s| s.name);
                println!("{} {:<8} {:<22} {} ({})", appointment.date, appointment.time_slot, specialty, appointment.reason, appointment.kind.as_str());
            }
        }
        Command::Record => {
            let record = reference::sample_health_record();
            let patient = &record.patient;

            println!("{}", patient.name);
            println!("DOB: {} | {} | Blood Type: {}", patient.date_of_birth, patient.gender, patient.blood_type);
            println!();
            println!("Allergies:");
            for allergy in record.allergies {
                println!("- {} ({}, {:?}): {}", allergy.name, allergy.kind, allergy.severity, allergy.reaction);
            }
            println!("Conditions:");
            for condition in record.conditions {
                println!("- {} since {} ({}): {}", condition.name, condition.diagnosed, condition.status, condition.notes);
            }
            println!("Current medications:");
            for medication in record.medications {
                println!("- {} {}, {} for {}", medication.name, medication.dosage, medication.frequency, medication.purpose);
            }
            println!("Flagged lab results:");
            for (panel, result) in record.flagged_results() {
                println!("- {} / {}: {} (range {}, {:?})", panel.name, result.test, result.value, result.range, result.status);
            }
            println!("Recent visits:");
            for visit in record.visits {
                println!("- {} {} with {}: {}", visit.date, visit.kind, visit.provider, visit.reason);
            }
            println!();
            println!("{RECORD_FOOTER}");
        }
    }

    Ok(())
}

/// Collect symptom ids, rejecting anything outside the catalog.
fn parse_symptoms(ids: &[String]) -> Res<SelectedSymptomSet> {
    if let Some(unknown) = ids.iter().find(|id| !catalog::is_known(id)) {
        return Err(anyhow::anyhow!("Unknown symptom `{unknown}`. Run `health-triage symptoms` to list them."));
    }

    Ok(ids.iter().map(String::as_str).collect())
}
