// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks::{
    BenefitAvailability, BenefitInstance, BenefitInstanceState, BenefitTracker, CardSummary,
    CoreError, MonthlyScope, StayRepository, StayTracker, YearSummary,
};
use cardperks_api::{SpendingReport, load_config, nights_report, spending_report};
use cardperks_domain::{
    CardDefinition, DateInterval, NightsSummary, StayLog, anniversary_window, anniversary_year_of,
    parse_iso_date,
};
use cardperks_persistence::Store;
use clap::{ArgAction, Args, Subcommand, ValueEnum};
use color_eyre::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

/// Parses a `YYYY-MM-DD` command line date.
pub fn parse_date(value: &str) -> Result<Date, String> {
    parse_iso_date(value).map_err(|err| err.to_string())
}

/// Options shared by every command.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Card and benefit configuration (YAML, or JSON by extension)
    #[arg(long, global = true, default_value = "benefits_config.yaml")]
    pub config: PathBuf,

    /// Benefit state file
    #[arg(long, global = true, default_value = "benefits_state.json")]
    pub state: PathBuf,

    /// Stays file
    #[arg(long, global = true, default_value = "stays_state.json")]
    pub stays: PathBuf,

    /// Keep benefit state and stays in this `SQLite` database instead of the JSON files
    #[arg(long, global = true)]
    pub sqlite: Option<PathBuf>,

    /// Reference date (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<Date>,

    /// Directory holding the "hyatt personal" and "hyatt business" statement folders
    #[arg(long, global = true, default_value = "transactions")]
    pub transactions: PathBuf,
}

impl GlobalOptions {
    fn today(&self) -> Date {
        self.today
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }

    fn open_store(&self) -> Result<Store> {
        let store: Store = match &self.sqlite {
            Some(path) => {
                info!("Using SQLite database at: {}", path.display());
                Store::open_sqlite(path)?
            }
            None => Store::open_json(&self.state, &self.stays)?,
        };
        Ok(store)
    }

    fn tracker(&self) -> Result<BenefitTracker<Store>> {
        let config = load_config(&self.config)?;
        Ok(BenefitTracker::new(config, self.open_store()?, self.today()))
    }

    fn stay_tracker(&self) -> Result<StayTracker<Store>> {
        Ok(StayTracker::new(self.open_store()?))
    }
}

/// Which monthly periods `set-monthly` touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scope {
    /// Every monthly period of the year
    All,
    /// Periods that have started by today
    UpToToday,
    /// Periods that start after today
    AfterToday,
}

impl From<Scope> for MonthlyScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::All => Self::All,
            Scope::UpToToday => Self::UpToToday,
            Scope::AfterToday => Self::AfterToday,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List benefit instances grouped by category
    #[command(visible_alias = "b")]
    Benefits {
        /// Only this card entry
        #[arg(long)]
        card: Option<String>,
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },

    /// List cards grouped by base name with their year entries
    Cards,

    /// Flip the posted flag of a benefit instance
    #[command(visible_alias = "t")]
    Toggle {
        /// Unique benefit id (e.g. `amex_platinum_uber`)
        benefit_id: String,
        /// Period identifier (e.g. `2026-Mar`)
        period: String,
        /// Anniversary year a calendar benefit is used toward
        #[arg(long)]
        anniversary_year: Option<i32>,
    },

    /// Set the posted flag of a benefit instance
    SetPosted {
        /// Unique benefit id
        benefit_id: String,
        /// Period identifier
        period: String,
        /// `true` or `false`
        #[arg(action = ArgAction::Set)]
        posted: bool,
        /// Post date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
    },

    /// Record the amount actually used; omit the amount to clear it
    SetAmount {
        /// Unique benefit id
        benefit_id: String,
        /// Period identifier
        period: String,
        /// Amount used, between 0 and the face amount
        amount: Option<Decimal>,
    },

    /// Post or unpost the monthly instances of a category in one anniversary year
    SetMonthly {
        /// Card entry key
        card: String,
        /// Anniversary year
        year: i32,
        /// Benefit category
        category: String,
        /// `true` or `false`
        #[arg(action = ArgAction::Set)]
        posted: bool,
        /// Which months to change
        #[arg(long, value_enum, default_value_t = Scope::All)]
        scope: Scope,
    },

    /// Summarize card value for the current calendar year
    #[command(visible_alias = "s")]
    Summary {
        /// Only this card entry
        #[arg(long)]
        card: Option<String>,
    },

    /// Summarize one anniversary year of a card entry
    YearSummary {
        /// Card entry key
        card: String,
        /// Anniversary year
        year: i32,
    },

    /// Show a card's anniversary window
    Window {
        /// Card entry key
        card: String,
        /// Anniversary year; defaults to the year containing --date or today
        #[arg(long)]
        year: Option<i32>,
        /// Find the anniversary year containing this date
        #[arg(long, value_parser = parse_date, conflicts_with = "year")]
        date: Option<Date>,
    },

    /// Show the four-year cooldown of a benefit instance
    Cooldown {
        /// Unique benefit id
        benefit_id: String,
        /// Period identifier
        period: String,
    },

    /// Report statement spending and bonus nights
    Spending {
        /// Include every transaction with its running totals
        #[arg(long)]
        events: bool,
    },

    /// Report this year's nights from every source
    Nights,

    /// Manage hotel stays
    #[command(subcommand)]
    Stay(StayCommand),

    /// Manage guest-of-honor nights
    #[command(subcommand)]
    GuestNight(GuestNightCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum StayCommand {
    /// Add a stay
    Add {
        /// Hotel name
        name: String,
        /// Check-in date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        check_in: Date,
        /// Check-out date (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        check_out: Date,
    },
    /// Delete the stay at an index
    Delete {
        /// Zero-based position in the list
        index: usize,
    },
    /// List stays and guest-of-honor nights
    List,
}

#[derive(Debug, Clone, Subcommand)]
pub enum GuestNightCommand {
    /// Add a guest-of-honor night
    Add {
        /// Guest name
        name: String,
        /// Night (YYYY-MM-DD)
        #[arg(value_parser = parse_date)]
        date: Date,
    },
    /// Delete the guest-of-honor night at an index
    Delete {
        /// Zero-based position in the list
        index: usize,
    },
}

#[derive(Debug, Serialize)]
struct UpdatedInstance<'a> {
    benefit_id: &'a str,
    period: &'a str,
    #[serde(flatten)]
    state: BenefitInstanceState,
}

#[derive(Debug, Serialize)]
struct MonthlyUpdate {
    changed: usize,
}

#[derive(Debug, Serialize)]
struct YearBenefit {
    #[serde(flatten)]
    instance: BenefitInstance,
    lock_reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct YearReport {
    card_key: String,
    card_name: String,
    summary: YearSummary,
    benefits: Vec<YearBenefit>,
}

#[derive(Debug, Serialize)]
struct WindowReport {
    card_key: String,
    year: i32,
    #[serde(flatten)]
    window: DateInterval,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_updated(benefit_id: &str, period: &str, state: BenefitInstanceState) -> Result<()> {
    print_json(&UpdatedInstance {
        benefit_id,
        period,
        state,
    })
}

impl Command {
    /// Runs the command and prints its JSON result.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded or written, or the
    /// tracker rejects the operation.
    pub fn run(self, options: &GlobalOptions) -> Result<()> {
        debug!("Running {:?}", self);
        match self {
            Self::Benefits { card, category } => {
                let tracker: BenefitTracker<Store> = options.tracker()?;
                if let Some(key) = &card {
                    tracker.card(key)?;
                }
                let mut grouped: BTreeMap<String, Vec<BenefitInstance>> =
                    tracker.benefits_by_category(card.as_deref());
                if let Some(category) = category {
                    grouped.retain(|label, _| *label == category);
                }
                print_json(&grouped)
            }
            Self::Cards => print_json(&options.tracker()?.card_groups()),
            Self::Toggle {
                benefit_id,
                period,
                anniversary_year,
            } => {
                let state: BenefitInstanceState =
                    options
                        .tracker()?
                        .toggle_benefit(&benefit_id, &period, anniversary_year)?;
                print_updated(&benefit_id, &period, state)
            }
            Self::SetPosted {
                benefit_id,
                period,
                posted,
                date,
            } => {
                let state: BenefitInstanceState =
                    options
                        .tracker()?
                        .set_benefit_posted(&benefit_id, &period, posted, date)?;
                print_updated(&benefit_id, &period, state)
            }
            Self::SetAmount {
                benefit_id,
                period,
                amount,
            } => {
                let state: BenefitInstanceState =
                    options
                        .tracker()?
                        .set_custom_amount(&benefit_id, &period, amount)?;
                print_updated(&benefit_id, &period, state)
            }
            Self::SetMonthly {
                card,
                year,
                category,
                posted,
                scope,
            } => {
                let changed: usize = options.tracker()?.set_monthly_posted(
                    &card,
                    year,
                    &category,
                    posted,
                    scope.into(),
                )?;
                print_json(&MonthlyUpdate { changed })
            }
            Self::Summary { card } => {
                let tracker: BenefitTracker<Store> = options.tracker()?;
                match card {
                    Some(key) => print_json(&tracker.card_summary(&key)?),
                    None => {
                        let summaries: Vec<CardSummary> = tracker.all_card_summaries();
                        print_json(&summaries)
                    }
                }
            }
            Self::YearSummary { card, year } => year_summary(options, &card, year),
            Self::Window { card, year, date } => window(options, &card, year, date),
            Self::Cooldown { benefit_id, period } => {
                let tracker: BenefitTracker<Store> = options.tracker()?;
                let instance: BenefitInstance = tracker
                    .all_benefits()
                    .into_iter()
                    .find(|instance| instance.benefit_id == benefit_id && instance.period == period)
                    .ok_or(CoreError::BenefitNotFound { benefit_id })?;
                let availability: BenefitAvailability = tracker.every_four_years_info(&instance);
                print_json(&availability)
            }
            Self::Spending { events } => {
                let mut report: SpendingReport =
                    spending_report(&options.transactions, options.today())?;
                if !events {
                    report.personal.events.clear();
                    report.business.events.clear();
                }
                print_json(&report)
            }
            Self::Nights => {
                let tracker: BenefitTracker<Store> = options.tracker()?;
                let spending: SpendingReport =
                    spending_report(&options.transactions, tracker.today())?;
                let summary: NightsSummary =
                    nights_report(&tracker, &spending, tracker.repository().stay_log());
                print_json(&summary)
            }
            Self::Stay(command) => command.run(options),
            Self::GuestNight(command) => command.run(options),
        }
    }
}

fn year_summary(options: &GlobalOptions, card_key: &str, year: i32) -> Result<()> {
    let tracker: BenefitTracker<Store> = options.tracker()?;
    let card: &CardDefinition = tracker.card(card_key)?;

    let instances: Vec<BenefitInstance> = tracker.filtered_benefits_for_year(card_key, year);
    let summary: YearSummary = tracker.year_summary(&instances, card.meta.annual_fee(), year);
    let benefits: Vec<YearBenefit> = instances
        .into_iter()
        .map(|instance| YearBenefit {
            lock_reason: tracker.lock_reason(&instance, year),
            instance,
        })
        .collect();

    print_json(&YearReport {
        card_key: card_key.to_string(),
        card_name: card.meta.display_name().to_string(),
        summary,
        benefits,
    })
}

fn window(
    options: &GlobalOptions,
    card_key: &str,
    year: Option<i32>,
    date: Option<Date>,
) -> Result<()> {
    let config = load_config(&options.config)?;
    let card: &CardDefinition = config
        .card(card_key)
        .ok_or_else(|| CoreError::CardNotFound(card_key.to_string()))?;

    let year: i32 = match year {
        Some(year) => year,
        None => anniversary_year_of(&card.meta, date.unwrap_or_else(|| options.today()))?,
    };
    let window: DateInterval = anniversary_window(&card.meta, year)?;

    print_json(&WindowReport {
        card_key: card_key.to_string(),
        year,
        window,
    })
}

impl StayCommand {
    fn run(self, options: &GlobalOptions) -> Result<()> {
        let mut tracker: StayTracker<Store> = options.stay_tracker()?;
        match self {
            Self::Add {
                name,
                check_in,
                check_out,
            } => tracker.add_stay(&name, check_in, check_out)?,
            Self::Delete { index } => tracker.delete_stay(index)?,
            Self::List => {}
        }
        let log: &StayLog = tracker.log();
        print_json(log)
    }
}

impl GuestNightCommand {
    fn run(self, options: &GlobalOptions) -> Result<()> {
        let mut tracker: StayTracker<Store> = options.stay_tracker()?;
        match self {
            Self::Add { name, date } => tracker.add_guest_night(&name, date)?,
            Self::Delete { index } => tracker.delete_guest_night(index)?,
        }
        print_json(tracker.log())
    }
}
