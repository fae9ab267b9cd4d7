//! Shell commands and the screen state behind them.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, Editor};

use digifarm_application::{DetectionService, DigiFarmApp};
use digifarm_core::detection::{DetectionState, DroppedFile, infer_mime_type};
use digifarm_core::error::DigiFarmError;
use digifarm_core::marketplace::{Category, ProductDetail, ProductQuery, QuantitySelector};
use digifarm_core::route::{Navigation, Route};

use crate::helper::CliHelper;
use crate::render;

pub type ShellEditor = Editor<CliHelper, DefaultHistory>;

/// One line typed at the prompt.
#[derive(Parser, Debug)]
#[command(multicall = true)]
pub struct ReplLine {
    #[command(subcommand)]
    pub command: ReplCommand,
}

#[derive(Subcommand, Debug)]
pub enum ReplCommand {
    /// Sign in; prompts for username and password
    Login,
    /// Sign out and return to the login screen
    Logout,
    /// Show the current session
    Whoami,
    /// Navigate to a path, e.g. /disease-detection
    Go { path: String },
    /// Stage an image for disease detection
    Upload {
        /// Image path; may contain spaces
        #[arg(required = true)]
        file: Vec<String>,
    },
    /// Analyze the staged image
    Analyze {
        /// Return immediately; check progress with `status`
        #[arg(short, long)]
        background: bool,
    },
    /// Stop a running analysis, keeping the image
    Cancel,
    /// Remove the staged image and any result
    Clear,
    /// Show the current screen, session and detection state
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Search the marketplace
    Market {
        term: Vec<String>,
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Open a product page
    Product { id: u32 },
    /// Change the order quantity: +, - or a number
    Qty {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

pub enum Flow {
    Continue,
    Quit,
}

/// Screen state of the shell on top of a [`DigiFarmApp`].
pub struct Shell {
    app: DigiFarmApp,
    detection: Option<DetectionService>,
    product: Option<(ProductDetail, QuantitySelector)>,
}

impl Shell {
    pub fn new(app: DigiFarmApp) -> Self {
        Self {
            app,
            detection: None,
            product: None,
        }
    }

    pub async fn prompt(&self) -> String {
        let session = self.app.login().current().await;
        let route = self.app.navigator().current().await;
        if session.is_authenticated {
            format!("{}@{}> ", session.username, route.path())
        } else {
            format!("{}> ", route.path())
        }
    }

    pub async fn execute(&mut self, command: ReplCommand, rl: &mut ShellEditor) -> Result<Flow> {
        match command {
            ReplCommand::Login => self.login(rl).await?,
            ReplCommand::Logout => {
                self.app.login().logout().await;
                println!("{}", "Signed out.".bright_black());
                self.refresh().await;
            }
            ReplCommand::Whoami => render::session(&self.app.login().current().await),
            ReplCommand::Go { path } => match self.app.navigator().navigate(&path).await {
                Ok(navigation) => self.enter(navigation).await,
                Err(e) => report(&e),
            },
            ReplCommand::Upload { file } => self.upload(&upload_path(&file)).await,
            ReplCommand::Analyze { background } => self.analyze(background).await?,
            ReplCommand::Cancel => {
                if let Some(detection) = self.detection_screen() {
                    if detection.cancel().await {
                        println!("{}", "Analysis cancelled; the image is still staged.".yellow());
                    } else {
                        println!("{}", "No analysis is running.".bright_black());
                    }
                }
            }
            ReplCommand::Clear => {
                if let Some(detection) = self.detection_screen() {
                    detection.clear().await;
                    println!("{}", "Cleared.".bright_black());
                }
            }
            ReplCommand::Status { json } => self.status(json).await?,
            ReplCommand::Market { term, category } => self.market(&term.join(" "), category).await,
            ReplCommand::Product { id } => {
                let navigation = self.app.navigator().go(Route::ProductDetail(id)).await;
                self.enter(navigation).await;
            }
            ReplCommand::Qty { value } => self.quantity(&value),
            ReplCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn login(&mut self, rl: &mut ShellEditor) -> Result<()> {
        let username = rl.readline("Username: ")?;
        let password = read_password(rl)?;

        println!("{}", "Signing in...".bright_black());
        match self.app.login().login(&username, &password).await {
            Ok(session) => {
                println!("{}", format!("Welcome, {}!", session.username).bright_green());
                self.refresh().await;
            }
            Err(e) => report(&e),
        }
        Ok(())
    }

    async fn refresh(&mut self) {
        let navigation = self.app.navigator().refresh().await;
        self.enter(navigation).await;
    }

    /// Opens whatever screen `navigation` landed on.
    async fn enter(&mut self, navigation: Navigation) {
        if navigation.was_redirected() {
            println!(
                "{}",
                format!("{} is not available; showing {}", navigation.requested, navigation.resolved)
                    .yellow()
            );
        }
        self.leave_other_screens(navigation.resolved);

        match navigation.resolved {
            Route::Login => println!("{}", "Sign in with `login`.".bright_black()),
            Route::AdminDashboard => println!("{}", "Admin dashboard".bright_magenta().bold()),
            Route::UserDashboard => {
                println!("{}", "Dashboard".bright_magenta().bold());
                println!(
                    "{}",
                    "Try `go /disease-detection` or `market`.".bright_black()
                );
            }
            Route::DiseaseDetection => {
                if self.detection.is_some() {
                    return;
                }
                match self.app.open_detection().await {
                    Ok(service) => {
                        self.detection = Some(service);
                        println!("{}", "Disease detection".bright_magenta().bold());
                        println!(
                            "{}",
                            "Upload a JPEG, PNG or GIF of the affected leaf with `upload <file>`."
                                .bright_black()
                        );
                    }
                    Err(redirect) => self.bounce(redirect).await,
                }
            }
            Route::Marketplace => {
                render::products(&self.app.products().search(&ProductQuery::default()));
            }
            Route::ProductDetail(id) => match self.app.open_product(id).await {
                Ok(Ok((detail, quantity))) => {
                    render::product_detail(&detail, &quantity);
                    self.product = Some((detail, quantity));
                }
                Ok(Err(e)) => {
                    report(&e);
                    self.app.navigator().go(Route::Marketplace).await;
                }
                Err(redirect) => self.bounce(redirect).await,
            },
        }
    }

    /// Leaving a screen tears down its state.
    fn leave_other_screens(&mut self, route: Route) {
        if route != Route::DiseaseDetection {
            self.detection = None;
        }
        if !matches!(route, Route::ProductDetail(_)) {
            self.product = None;
        }
    }

    async fn bounce(&mut self, redirect: Navigation) {
        let navigation = self.app.navigator().go(redirect.resolved).await;
        println!(
            "{}",
            format!("Redirected to {}", navigation.resolved).yellow()
        );
        self.leave_other_screens(navigation.resolved);
    }

    fn detection_screen(&self) -> Option<&DetectionService> {
        if self.detection.is_none() {
            println!(
                "{}",
                "Open the detection screen first: go /disease-detection".bright_black()
            );
        }
        self.detection.as_ref()
    }

    async fn upload(&self, file: &Path) {
        let Some(detection) = self.detection_screen() else {
            return;
        };

        let bytes = match tokio::fs::read(file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                report(&DigiFarmError::from(e));
                return;
            }
        };
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let mime_type = infer_mime_type(&name);

        match detection.stage(vec![DroppedFile::new(name.clone(), mime_type, bytes)]).await {
            Ok(preview) => {
                println!("{}", format!("Staged {}", name).green());
                println!("  Preview: {}", preview.url().bright_black());
                println!("{}", "Run `analyze` to detect diseases.".bright_black());
            }
            Err(e) => report(&e),
        }
    }

    async fn analyze(&self, background: bool) -> Result<()> {
        let Some(detection) = self.detection_screen() else {
            return Ok(());
        };

        let Some(handle) = detection.analyze().await else {
            let message = match detection.state().await {
                DetectionState::Analyzing => "An analysis is already running.",
                DetectionState::Idle => "Nothing to analyze. Upload an image first.",
                _ => "Clear or re-upload the image to analyze again.",
            };
            println!("{}", message.bright_black());
            return Ok(());
        };

        if background {
            println!(
                "{}",
                "Analyzing in the background; use `status` or `cancel`.".bright_black()
            );
            return Ok(());
        }

        println!("{}", "Analyzing...".yellow());
        tokio::select! {
            finished = handle.wait() => finished?,
            _ = tokio::signal::ctrl_c() => {
                detection.cancel().await;
                println!("{}", "Analysis cancelled.".yellow());
                return Ok(());
            }
        }
        render::detection(&detection.snapshot().await);
        Ok(())
    }

    async fn status(&self, json: bool) -> Result<()> {
        let route = self.app.navigator().current().await;
        let session = self.app.login().current().await;
        let detection = match &self.detection {
            Some(service) => Some(service.snapshot().await),
            None => None,
        };

        if json {
            let status = serde_json::json!({
                "route": route.path(),
                "session": session,
                "detection": detection,
                "quantity": self.product.as_ref().map(|(_, q)| q),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        println!("Screen: {}", route.path().cyan());
        render::session(&session);
        if let Some(snapshot) = &detection {
            render::detection(snapshot);
        }
        if let Some((detail, quantity)) = &self.product {
            render::order(detail.product.price, &detail.product.unit, quantity);
        }
        Ok(())
    }

    async fn market(&mut self, term: &str, category: Option<Category>) {
        let navigation = self.app.navigator().go(Route::Marketplace).await;
        if navigation.resolved != Route::Marketplace {
            self.enter(navigation).await;
            return;
        }
        self.leave_other_screens(Route::Marketplace);

        let mut query = ProductQuery::new(term);
        if let Some(category) = category {
            query = query.with_category(category);
        }
        render::products(&self.app.products().search(&query));
    }

    fn quantity(&mut self, value: &str) {
        let Some((detail, quantity)) = self.product.as_mut() else {
            println!("{}", "Open a product first: product <id>".bright_black());
            return;
        };
        match value {
            "+" => quantity.increase(),
            "-" => quantity.decrease(),
            other => quantity.set_from_input(other),
        };
        render::order(detail.product.price, &detail.product.unit, quantity);
    }
}

/// Reads without echoing the password. `readline` never records history on
/// its own; only the main loop adds entries.
fn read_password(rl: &mut ShellEditor) -> rustyline::Result<String> {
    if let Some(helper) = rl.helper_mut() {
        helper.set_masking(true);
    }
    // Masking goes through the highlighter, which is skipped unless colors are on.
    rl.set_color_mode(ColorMode::Forced);
    let password = rl.readline("Password: ");
    rl.set_color_mode(ColorMode::Enabled);
    if let Some(helper) = rl.helper_mut() {
        helper.set_masking(false);
    }
    password
}

/// Lines are split on whitespace, so a path with spaces arrives in pieces.
fn upload_path(parts: &[String]) -> PathBuf {
    PathBuf::from(parts.join(" "))
}

fn report(error: &DigiFarmError) {
    eprintln!("{}", error.to_string().red());
}
