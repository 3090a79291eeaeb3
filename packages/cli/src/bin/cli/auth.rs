// ABOUTME: CLI commands for signing in, registering and signing out of EventHub
// ABOUTME: Provider login opens the system browser; guest flows prompt for credentials

use anyhow::{bail, Context, Result};
use colored::*;
use inquire::{Password, PasswordDisplayMode, Select, Text};

use eventhub_auth::{GuestCredentials, GuestRegistration, OAuthProvider, Resource, SignInOutcome};
use eventhub_cli::AppContext;

pub async fn login_command(ctx: &AppContext, provider: Option<&str>) -> Result<()> {
    let provider = match provider {
        Some(p) => p.parse::<OAuthProvider>()?,
        None => prompt_provider_selection()?,
    };

    println!(
        "{}",
        format!("🔐 Signing in with {}...", provider.display_name())
            .bold()
            .cyan()
    );
    println!(
        "  Complete sign-in in your browser (waiting up to {}s)",
        ctx.config.redirect_timeout.as_secs()
    );

    let outcome = ctx.manager.sign_in_with_provider(provider).await?;
    report_outcome(outcome);
    Ok(())
}

pub async fn guest_login_command(ctx: &AppContext, email: Option<String>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password("Password:")?;

    let outcome = ctx
        .manager
        .sign_in_as_guest(&GuestCredentials::new(email, password))
        .await?;
    report_outcome(outcome);
    Ok(())
}

pub async fn register_command(ctx: &AppContext, email: Option<String>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password("Password:")?;
    // Confirmation is checked by the backend, not here
    let re_password = prompt_password("Confirm password:")?;

    let outcome = ctx
        .manager
        .register_as_guest(&GuestRegistration::new(email, password, re_password))
        .await?;
    report_outcome(outcome);
    Ok(())
}

pub async fn logout_command(ctx: &AppContext) -> Result<()> {
    if ctx.sign_out().await? {
        println!("{} Signed out", "✓".green().bold());
    } else {
        println!("{} Not signed in", "ℹ".cyan());
    }
    Ok(())
}

pub async fn status_command(ctx: &AppContext) -> Result<()> {
    println!("{}", "🔐 EventHub Session Status".bold().cyan());
    println!();
    println!("  API:         {}", ctx.config.api_url);
    println!("  Token store: {}", ctx.config.token_store);

    if !ctx.session.is_authenticated() {
        println!("  {} Not signed in", "✗".red().bold());
        return Ok(());
    }

    match ctx.fetcher.fetch(Resource::CurrentUser).await {
        Ok(user) => {
            println!("  {} Signed in", "✓".green().bold());
            if let Some(email) = user.get("email").and_then(|v| v.as_str()) {
                println!("        Account: {}", email.cyan());
            }
        }
        Err(e) if e.is_unauthorized() => {
            println!(
                "  {} Session was rejected by the server and has been cleared",
                "✗".red().bold()
            );
        }
        Err(e) => {
            println!("  {} Signed in (could not reach server: {})", "⚠".yellow(), e);
        }
    }
    Ok(())
}

fn report_outcome(outcome: SignInOutcome) {
    match outcome {
        SignInOutcome::SignedIn(_) => println!("{} Signed in", "✓".green().bold()),
        SignInOutcome::Cancelled => println!("{} Sign-in cancelled", "ℹ".cyan()),
    }
}

fn prompt_provider_selection() -> Result<OAuthProvider> {
    Select::new("Sign in with:", OAuthProvider::all())
        .prompt()
        .context("Provider selection cancelled")
}

fn prompt_email(email: Option<String>) -> Result<String> {
    let email = match email {
        Some(email) => email,
        None => Text::new("Email:")
            .prompt()
            .context("Email input cancelled")?,
    };
    let email = email.trim().to_string();
    if email.is_empty() {
        bail!("Email must not be empty");
    }
    Ok(email)
}

fn prompt_password(message: &str) -> Result<String> {
    Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Password input cancelled")
}
