//! Interactive terminal console.
//!
//! Screens correspond one-to-one to [`Route`]s; every screen switch goes
//! through the navigation guard, and a pending `SessionExpired` event
//! forces the next switch to the login screen. Public dashboard screens
//! render without a session; admin screens are only reachable through an
//! administrator sign-in.

use crate::api::models::RecordQuery;
use crate::api::transport::Transport;
use crate::api::{dashboard, water_quality};
use crate::auth::events::AuthEvent;
use crate::auth::session::Session;
use crate::router::guard::{authorize, GuardVerdict};
use crate::router::routes::{Route, RouteIntent};
use anyhow::Result;
use console::style;
use std::sync::Arc;
use tokio::sync::broadcast;

enum MenuChoice {
    Screen(Route),
    SignOut,
    Quit,
}

/// Terminal front end over the session, guard, and API client.
pub struct Console {
    transport: Arc<Transport>,
    session: Arc<Session>,
    auth_events: broadcast::Receiver<AuthEvent>,
}

impl Console {
    pub fn new(transport: Arc<Transport>, session: Arc<Session>) -> Self {
        let auth_events = transport.events().subscribe();
        Self {
            transport,
            session,
            auth_events,
        }
    }

    /// Attempt to show a screen. The guard may land somewhere else; the
    /// route actually rendered is returned.
    pub async fn navigate(&mut self, route: Route) -> Result<Route> {
        let intent = RouteIntent::new(route);
        let target = match authorize(&intent, &self.session).await {
            GuardVerdict::Allow => intent.route,
            GuardVerdict::Redirect(redirect) => {
                eprintln!(
                    "{}",
                    style(format!("Redirected to {}", redirect.title())).dim()
                );
                redirect
            }
        };
        self.render(&target).await?;
        Ok(target)
    }

    /// Interactive loop: pick a screen, render it, repeat.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let choice = match self.forced_redirect() {
                Some(route) => MenuChoice::Screen(route),
                None => self.pick_screen()?,
            };
            let route = match choice {
                MenuChoice::Screen(route) => route,
                MenuChoice::SignOut => {
                    self.session.logout().await;
                    println!("{}", style("Signed out").dim());
                    continue;
                }
                MenuChoice::Quit => return Ok(()),
            };
            if let Err(err) = self.navigate(route).await {
                // Failures are already surfaced as notices; keep the
                // console alive.
                tracing::debug!("Screen render failed: {err}");
            }
        }
    }

    /// A session-expired signal queued since the last screen forces the
    /// login screen, the terminal analog of the SPA's hard redirect.
    fn forced_redirect(&mut self) -> Option<Route> {
        let mut expired = false;
        while let Ok(event) = self.auth_events.try_recv() {
            if event == AuthEvent::SessionExpired {
                expired = true;
            }
        }
        expired.then_some(Route::Login)
    }

    fn pick_screen(&self) -> Result<MenuChoice> {
        let signed_in = self.session.is_authenticated();
        let choices = [
            "Dashboard",
            "Sampling methods",
            "Admin overview",
            "Water quality records",
            if signed_in { "Sign out" } else { "Sign in" },
            "Quit",
        ];
        let picked = dialoguer::Select::new()
            .with_prompt("Where to?")
            .items(&choices)
            .default(0)
            .interact()?;

        Ok(match picked {
            0 => MenuChoice::Screen(Route::Dashboard),
            1 => MenuChoice::Screen(Route::MethodsOverview),
            2 => MenuChoice::Screen(Route::AdminHome),
            3 => MenuChoice::Screen(Route::AdminRecords),
            4 if signed_in => MenuChoice::SignOut,
            4 => MenuChoice::Screen(Route::Login),
            _ => MenuChoice::Quit,
        })
    }

    // ── Screens ──────────────────────────────────────────────

    async fn render(&mut self, route: &Route) -> Result<()> {
        println!();
        println!("{}", style(route.title()).bold().underlined());

        match route {
            Route::Dashboard => self.screen_dashboard().await,
            Route::MethodsOverview => self.screen_methods().await,
            Route::MethodDashboard(method) => self.screen_method_dashboard(method).await,
            Route::Login => self.screen_login().await,
            Route::AdminHome => self.screen_admin_home().await,
            Route::AdminRecords => self.screen_admin_records().await,
        }
    }

    async fn screen_dashboard(&self) -> Result<()> {
        let snapshot = dashboard::all(&self.transport).await?;
        let overview = &snapshot.overview;

        println!(
            "{} records · {:.1}% excellent · last update {}",
            overview.total_records, overview.excellent_rate, overview.latest_update
        );
        println!(
            "levels: I-III {} / IV {} / V {} / worse-than-V {} / polluted {}",
            overview.excellent_count,
            overview.good_count,
            overview.poor_count,
            overview.very_poor_count,
            overview.polluted_count
        );

        if !snapshot.warning_data.is_empty() {
            println!("\n{}", style("Warnings").yellow().bold());
            for warning in &snapshot.warning_data {
                println!(
                    "  [{}] {}: {} ({})",
                    warning.warning_level,
                    warning.river_name,
                    warning.comprehensive_quality_level,
                    warning.sampling_date
                );
            }
        }

        println!("\n{}", style("Rivers").bold());
        for river in &snapshot.river_stats {
            println!(
                "  {:<20} {:>5} samples · {:.1}% excellent",
                river.river_name, river.total_count, river.excellent_rate
            );
        }
        Ok(())
    }

    async fn screen_methods(&self) -> Result<()> {
        let methods = dashboard::method_list(&self.transport).await?;
        println!("{} sampling methods:", methods.total_count);
        for method in &methods.methods {
            println!("  - {method}");
        }
        Ok(())
    }

    async fn screen_method_dashboard(&self, method: &str) -> Result<()> {
        let data = dashboard::method_all(&self.transport, method).await?;
        println!("{}", serde_json::to_string_pretty(&data)?);
        Ok(())
    }

    async fn screen_login(&self) -> Result<()> {
        let username: String = dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()?;
        let password = dialoguer::Password::new()
            .with_prompt("Password")
            .interact()?;

        match self.session.login(&username, &password).await {
            Ok(()) => {
                let name = self
                    .session
                    .identity()
                    .map(|profile| profile.username)
                    .unwrap_or_default();
                println!("{}", style(format!("Signed in as {name}")).green());
            }
            Err(_) => {
                let message = self
                    .session
                    .form_error()
                    .unwrap_or_else(|| "Sign-in failed".to_string());
                println!("{}", style(message).red());
            }
        }
        Ok(())
    }

    async fn screen_admin_home(&self) -> Result<()> {
        if let Some(profile) = self.session.identity() {
            println!(
                "Signed in as {} <{}>{}",
                profile.username,
                profile.email,
                if profile.is_admin { " (administrator)" } else { "" }
            );
        }
        let stats = water_quality::statistics_overview(&self.transport).await?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
        Ok(())
    }

    async fn screen_admin_records(&self) -> Result<()> {
        let page = water_quality::list(&self.transport, &RecordQuery::default()).await?;
        print_record_page(&page);
        Ok(())
    }
}

/// Shared record-table rendering for the console and the CLI.
pub fn print_record_page(page: &crate::api::models::WaterQualityPage) {
    println!(
        "{} records (page {} · {} per page)",
        page.total, page.page, page.per_page
    );
    for record in &page.items {
        println!(
            "  #{:<5} {:<20} {} · {}",
            record.id,
            record.river_name,
            record.sampling_date.date(),
            record
                .comprehensive_quality_level
                .as_deref()
                .unwrap_or("unrated")
        );
    }
}
