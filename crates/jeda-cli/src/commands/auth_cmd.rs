use jeda_core::api::ApiClient;
use jeda_core::auth::{confirm_account_deletion, SessionError, SessionProvider};
use jeda_core::settings::{ReconcileOutcome, SettingsSync};
use tokio::runtime::Handle;

use crate::auth::{clear_stored_session, load_stored_session, ProfileAuthClient};
use crate::cli::AuthCommands;
use crate::commands::common::CliContext;
use crate::error::CliError;

fn require_auth_client(context: &CliContext) -> Result<ProfileAuthClient, CliError> {
    context.auth_client()?.ok_or(CliError::ApiNotConfigured)
}

fn auth_error(error: impl ToString) -> CliError {
    CliError::Auth(error.to_string())
}

pub async fn run_auth(
    command: AuthCommands,
    global_profile: Option<&str>,
    context_for: impl Fn(Option<&str>) -> Result<CliContext, CliError>,
) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { profile, provider } => {
            let context = context_for(profile.as_deref().or(global_profile))?;
            let auth = require_auth_client(&context)?;
            let sign_in = auth
                .sign_in_social(provider.into())
                .await
                .map_err(auth_error)?;
            println!("Open this URL to sign in with {}:", sign_in.provider);
            println!("{}", sign_in.url);
            println!(
                "Then copy the session cookie value and run `jeda auth token --profile {} <TOKEN>`.",
                context.profile_name
            );
            Ok(())
        }
        AuthCommands::Token { profile, token } => {
            let context = context_for(profile.as_deref().or(global_profile))?;
            let config = context.require_client_config()?;
            let auth = require_auth_client(&context)?;
            let session = auth.complete_sign_in(&token).await.map_err(auth_error)?;
            println!(
                "Signed in profile '{}' as {}",
                context.profile_name, session.user.name
            );

            let remote = ApiClient::new(config)?.with_session_token(session.token);
            let (sync, _notifications) =
                SettingsSync::new(context.open_store(), Some(remote), Handle::current());
            match sync.reconcile_on_sign_in().await {
                Ok(ReconcileOutcome::AdoptedRemote) => {
                    println!("Loaded settings from your account");
                }
                Ok(ReconcileOutcome::PushedLocal) => {
                    println!("Uploaded local settings to your account");
                }
                Ok(ReconcileOutcome::Offline) => {}
                Err(error) => {
                    eprintln!("Warning: settings were not synced: {error}");
                }
            }
            println!("Sync status: {}", sync.sync_state().borrow().label());
            Ok(())
        }
        AuthCommands::Status { profile } => {
            let context = context_for(profile.as_deref().or(global_profile))?;
            let session = match context.auth_client()? {
                Some(auth) => auth.get_session().await.map_err(auth_error)?,
                None => load_stored_session(&context.profile_name).map_err(auth_error)?,
            };

            if let Some(session) = session {
                let email_label = session.user.email.as_deref().unwrap_or("(no email)");
                let expires_label = session.expires_at.map_or_else(
                    || "unknown".to_string(),
                    |expires_at| expires_at.to_rfc3339(),
                );
                println!(
                    "Profile '{}' is signed in as {} <{}> (expires_at={})",
                    context.profile_name, session.user.name, email_label, expires_label
                );
            } else {
                println!("Profile '{}' is not signed in.", context.profile_name);
            }
            Ok(())
        }
        AuthCommands::Logout { profile } => {
            let context = context_for(profile.as_deref().or(global_profile))?;
            if let Some(auth) = context.auth_client()? {
                if let Err(error) = auth.sign_out().await {
                    eprintln!("Warning: the server did not confirm sign-out: {error}");
                }
            } else {
                clear_stored_session(&context.profile_name).map_err(auth_error)?;
            }

            println!(
                "Signed out profile '{}'; local settings were kept",
                context.profile_name
            );
            Ok(())
        }
        AuthCommands::Delete { profile, confirm } => {
            confirm_account_deletion(&confirm).map_err(auth_error)?;
            let context = context_for(profile.as_deref().or(global_profile))?;
            let auth = require_auth_client(&context)?;
            match auth.delete_user().await {
                Ok(()) => {}
                Err(SessionError::NotSignedIn) => return Err(CliError::NotSignedIn),
                Err(error) => return Err(auth_error(error)),
            }
            println!("Deleted the account for profile '{}'", context.profile_name);
            Ok(())
        }
    }
}
