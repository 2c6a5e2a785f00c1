// src/cli.rs

use clap::{Parser, Subcommand};

use crate::config::AppState;

#[derive(Parser, Debug)]
#[command(name = "companies-backend")]
#[command(author, version, about = "Backend de contas e empresas")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Sobe o servidor HTTP (padrão)
    Serve,
    /// Cria um superusuário
    CreateSuperuser {
        /// E-mail do superusuário
        #[arg(short, long)]
        email: String,

        /// Senha inicial
        #[arg(short, long, env = "SUPERUSER_PASSWORD")]
        password: String,

        #[arg(long, default_value = "Admin")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },
    /// Remove da blacklist os tokens que já expiraram
    FlushExpiredTokens,
}

/// Executa um comando administrativo. `Serve` fica a cargo do `main`.
pub async fn run(command: Commands, app_state: &AppState) -> anyhow::Result<()> {
    match command {
        Commands::Serve => {}
        Commands::CreateSuperuser { email, password, first_name, last_name } => {
            let user = app_state
                .auth_service
                .create_superuser(&email, &password, &first_name, &last_name)
                .await?;
            tracing::info!("Superusuário criado: {} (id {})", user.email, user.id);
        }
        Commands::FlushExpiredTokens => {
            let removed = app_state.auth_service.flush_expired_tokens().await?;
            tracing::info!("{removed} tokens expirados removidos da blacklist");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["companies-backend"]).expect("argumentos válidos");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_create_superuser() {
        let cli = Cli::try_parse_from([
            "companies-backend",
            "create-superuser",
            "--email",
            "root@x.com",
            "--password",
            "segredo",
        ])
        .expect("argumentos válidos");

        assert_eq!(
            cli.command,
            Some(Commands::CreateSuperuser {
                email: "root@x.com".into(),
                password: "segredo".into(),
                first_name: "Admin".into(),
                last_name: String::new(),
            })
        );
    }

    #[test]
    fn parses_flush_expired_tokens() {
        let cli = Cli::try_parse_from(["companies-backend", "flush-expired-tokens"])
            .expect("argumentos válidos");
        assert_eq!(cli.command, Some(Commands::FlushExpiredTokens));
    }
}
