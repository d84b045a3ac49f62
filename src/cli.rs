//! # Commandes d'administration
//!
//! Chaque sous-commande ouvre sa propre connexion, s'exécute jusqu'au bout
//! dans une transaction puis rend la main. `serve` démarre l'API HTTP.

use std::time::Duration;

use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::{
    api::{self, AppState},
    core::import::atom::{import_atom, AtomVariant},
    core::import::gutenberg::{import_fake_data, import_pride},
    core::import::ImportReport,
    core::provisioning::{add_user, create_standard_user},
    infrastructure::database::{lifecycle::reset_database, schema::create_tables, Database},
    infrastructure::sources::{FileSource, HttpSource},
    utils::config::{Config, STANDARD_ROLE},
};

#[derive(Debug, Parser)]
#[command(name = "annotator", version, about = "Backend de l'outil d'annotation de textes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Démarre l'API HTTP
    Serve,
    /// Crée un super-utilisateur
    AddUser { username: String, password: String },
    /// Crée un utilisateur avec les problèmes du rôle "standard"
    CreateStandardUser { username: String, password: String },
    /// Importe le "Book of Wise Sayings" dans trois problèmes de démonstration
    ImportFakeData,
    /// Importe les paragraphes de "Pride and Prejudice"
    ImportPride,
    /// Importe l'export ATOM (table ATOM_risk)
    ImportAtom,
    /// Importe l'export ATOM en multi-label
    ImportAtomMl,
    /// Importe l'export ATOM en multi-classe
    ImportAtomMc,
    /// Importe l'export ATOM en binaire
    ImportAtomB,
    /// Crée les tables et marque le schéma à jour
    CreateTables,
    /// Supprime puis recrée la base de données
    ResetDb,
}

/// Exécute une commande avec la configuration chargée
pub async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    match command {
        Command::Serve => serve(connect(&config).await?, &config).await?,
        Command::AddUser { username, password } => {
            let db = connect(&config).await?;
            let user = add_user(&db.pool, &username, &password).await?;
            println!("User {} added", user.username);
        }
        Command::CreateStandardUser { username, password } => {
            let db = connect(&config).await?;
            let problem_ids = config.problems_for_role(STANDARD_ROLE);
            let (user, grants) =
                create_standard_user(&db.pool, &username, &password, problem_ids).await?;
            println!("User {} added ({} problem(s) granted)", user.username, grants.len());
        }
        Command::ImportFakeData => {
            let db = connect(&config).await?;
            let source = http_source(&config.wise_sayings_url, &config)?;
            let reports = import_fake_data(&db.pool, &source).await?;
            print_reports(&reports);
        }
        Command::ImportPride => {
            let db = connect(&config).await?;
            let source = http_source(&config.pride_url, &config)?;
            let report = import_pride(&db.pool, &source).await?;
            print_reports(&[report]);
        }
        Command::ImportAtom => run_atom_import(&config, AtomVariant::Legacy).await?,
        Command::ImportAtomMl => run_atom_import(&config, AtomVariant::MultiLabel).await?,
        Command::ImportAtomMc => run_atom_import(&config, AtomVariant::MultiClass).await?,
        Command::ImportAtomB => run_atom_import(&config, AtomVariant::Binary).await?,
        Command::CreateTables => {
            let db = connect(&config).await?;
            create_tables(&db.pool).await?;
            println!("Tables created");
        }
        Command::ResetDb => {
            // Passe par la base de maintenance: la base cible peut ne pas exister
            reset_database(&config.database_url)
                .await
                .context("réinitialisation de la base impossible")?;
            println!("Database reset");
        }
    }

    Ok(())
}

async fn connect(config: &Config) -> anyhow::Result<Database> {
    Database::new(&config.database_url, config.database_max_connections)
        .await
        .context("connexion à la base de données impossible")
}

async fn run_atom_import(config: &Config, variant: AtomVariant) -> anyhow::Result<()> {
    let db = connect(config).await?;
    let source = FileSource::new(&config.atom_csv_path);
    let report = import_atom(&db.pool, &source, variant).await?;
    print_reports(&[report]);
    Ok(())
}

fn http_source(url: &str, config: &Config) -> anyhow::Result<HttpSource> {
    Ok(HttpSource::new(
        url,
        Duration::from_secs(config.http_timeout_seconds),
    )?)
}

fn print_reports(reports: &[ImportReport]) {
    for report in reports {
        println!(
            "Inserted {} item(s) into problem '{}' ({})",
            report.inserted, report.problem_name, report.problem_id
        );
    }
}

async fn serve(db: Database, config: &Config) -> anyhow::Result<()> {
    let app_state = web::Data::new(AppState {
        db,
        jwt_secret: config.require_jwt_secret()?.to_string(),
        jwt_expiry_hours: config.jwt_expiry_hours,
    });

    let address = format!("{}:{}", config.server_host, config.server_port);
    info!("🔧 Mode: {}", config.run_mode);
    info!("🔗 API disponible sur http://{}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(app_state.clone())
            .configure(api::config)
    })
    .bind(&address)
    .with_context(|| format!("impossible d'écouter sur {}", address))?
    .workers(config.workers)
    .shutdown_timeout(10)
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn subcommands_use_kebab_case() {
        let cli = Cli::try_parse_from(["annotator", "import-atom-mc"]).unwrap();
        assert!(matches!(cli.command, Command::ImportAtomMc));

        let cli = Cli::try_parse_from(["annotator", "add-user", "admin", "s3cret-pass"]).unwrap();
        match cli.command {
            Command::AddUser { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "s3cret-pass");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn add_user_requires_both_arguments() {
        assert!(Cli::try_parse_from(["annotator", "add-user", "admin"]).is_err());
    }
}
