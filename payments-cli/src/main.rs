//! Payments CLI
//!
//! Command-line interface for the Payments API.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments_client::{ClientOptions, Environment, PaymentsClient, TokenCacheMode};
use payments_types::domain::payment::{
    BankTransfer, ExternalAccount, MerchantAccountBeneficiary, Preselected, UserSelected,
};
use payments_types::{
    AccountIdentifier, Beneficiary, CreatePaymentRequest, CreatePayoutRequest, Currency,
    PaymentMethod, PaymentUser, PayoutBeneficiary, ProviderSelection,
};

#[derive(Parser)]
#[command(name = "payments")]
#[command(author, version, about = "Payments API CLI client", long_about = None)]
struct Cli {
    /// OAuth client ID
    #[arg(long, env = "PAYMENTS_CLIENT_ID")]
    client_id: String,

    /// OAuth client secret
    #[arg(long, env = "PAYMENTS_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Target environment (sandbox, live)
    #[arg(long, env = "PAYMENTS_ENVIRONMENT", default_value = "sandbox")]
    environment: String,

    /// Base URI overriding the environment for every service, e.g. a local mock
    #[arg(long, env = "PAYMENTS_BASE_URI")]
    base_uri: Option<String>,

    /// Token cache (memory, none)
    #[arg(long, env = "PAYMENTS_TOKEN_CACHE", default_value = "memory")]
    token_cache: String,

    /// Seconds subtracted from a token's lifetime before caching it
    #[arg(long, env = "PAYMENTS_TOKEN_RENEWAL_BUFFER_SECS", default_value = "60")]
    token_renewal_buffer_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "PAYMENTS_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an access token
    Token {
        #[arg(long, default_value = "payments")]
        scope: String,
    },
    /// Payment operations
    Payment {
        #[command(subcommand)]
        action: PaymentCommands,
    },
    /// Payout operations
    Payout {
        #[command(subcommand)]
        action: PayoutCommands,
    },
    /// Merchant account operations
    MerchantAccount {
        #[command(subcommand)]
        action: MerchantAccountCommands,
    },
    /// Provider operations
    Provider {
        #[command(subcommand)]
        action: ProviderCommands,
    },
}

#[derive(Subcommand)]
enum PaymentCommands {
    /// Create a bank transfer payment into a merchant account
    Create {
        #[arg(long)]
        merchant_account: String,
        /// Amount in the smallest currency unit
        #[arg(long)]
        amount: u64,
        /// Currency (GBP, EUR, PLN)
        #[arg(long, default_value = "GBP")]
        currency: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        user_email: String,
        #[arg(long)]
        reference: Option<String>,
        /// Preselect a provider instead of letting the user pick one
        #[arg(long)]
        provider: Option<String>,
        /// Print a hosted payment page link returning to this URI
        #[arg(long)]
        return_uri: Option<String>,
    },
    /// Get payment details
    Get { id: String },
}

#[derive(Subcommand)]
enum PayoutCommands {
    /// Pay out from a merchant account to an IBAN
    Create {
        #[arg(long)]
        merchant_account: String,
        #[arg(long)]
        amount: u64,
        #[arg(long, default_value = "GBP")]
        currency: String,
        #[arg(long)]
        account_holder_name: String,
        #[arg(long)]
        iban: String,
        #[arg(long)]
        reference: String,
    },
    /// Get payout details
    Get { id: String },
}

#[derive(Subcommand)]
enum MerchantAccountCommands {
    /// List all merchant accounts
    List,
    /// Get merchant account details
    Get { id: String },
}

#[derive(Subcommand)]
enum ProviderCommands {
    /// Get provider details
    Get { id: String },
}

fn parse_currency(s: &str) -> Result<Currency> {
    s.parse::<Currency>().map_err(|e| anyhow::anyhow!(e))
}

fn client_options(cli: &Cli) -> Result<ClientOptions> {
    let environment = match &cli.base_uri {
        Some(uri) => Environment::custom(uri.as_str()),
        None => cli
            .environment
            .parse::<Environment>()
            .map_err(|e| anyhow::anyhow!(e))?,
    };
    let token_cache = cli
        .token_cache
        .parse::<TokenCacheMode>()
        .map_err(|e| anyhow::anyhow!(e))?;

    let mut options = ClientOptions::new(cli.client_id.clone(), cli.client_secret.clone())
        .with_environment(environment)
        .with_token_cache(token_cache)
        .with_token_renewal_buffer(Duration::from_secs(cli.token_renewal_buffer_secs));
    if let Some(secs) = cli.timeout_secs {
        options = options.with_timeout(Duration::from_secs(secs));
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payments_client=debug,payments_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let client = PaymentsClient::builder(client_options(&cli)?)
        .build()
        .context("failed to build payments client")?;

    match cli.command {
        Commands::Token { scope } => {
            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            let token = client.auth().get_token_cancellable(&scope, &cancel).await?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }

        Commands::Payment { action } => match action {
            PaymentCommands::Create {
                merchant_account,
                amount,
                currency,
                user_name,
                user_email,
                reference,
                provider,
                return_uri,
            } => {
                let provider_selection = match provider {
                    Some(provider_id) => ProviderSelection::Preselected(Preselected {
                        provider_id,
                        scheme_id: None,
                        remitter: None,
                    }),
                    None => ProviderSelection::UserSelected(UserSelected::default()),
                };
                let request = CreatePaymentRequest {
                    amount_in_minor: amount,
                    currency: parse_currency(&currency)?,
                    payment_method: PaymentMethod::BankTransfer(BankTransfer {
                        provider_selection,
                        beneficiary: Beneficiary::MerchantAccount(MerchantAccountBeneficiary {
                            merchant_account_id: merchant_account,
                            account_holder_name: None,
                            reference,
                        }),
                    }),
                    user: PaymentUser {
                        name: Some(user_name),
                        email: Some(user_email),
                        ..Default::default()
                    },
                    metadata: None,
                };

                let created = client.payments().create(&request).await?;
                println!("{}", serde_json::to_string_pretty(&created)?);

                if let Some(return_uri) = return_uri {
                    let link = client.payments().hosted_payment_page_link(
                        &created.id,
                        &created.resource_token,
                        &return_uri,
                    )?;
                    eprintln!("Hosted payment page: {}", link);
                }
            }
            PaymentCommands::Get { id } => {
                let payment = client.payments().get(&id).await?;
                println!("{}", serde_json::to_string_pretty(&payment)?);
            }
        },

        Commands::Payout { action } => match action {
            PayoutCommands::Create {
                merchant_account,
                amount,
                currency,
                account_holder_name,
                iban,
                reference,
            } => {
                let request = CreatePayoutRequest {
                    merchant_account_id: merchant_account,
                    amount_in_minor: amount,
                    currency: parse_currency(&currency)?,
                    beneficiary: PayoutBeneficiary::ExternalAccount(ExternalAccount {
                        account_holder_name,
                        account_identifier: AccountIdentifier::iban(iban),
                        reference,
                    }),
                    metadata: None,
                };
                let created = client.payouts().create(&request).await?;
                println!("{}", serde_json::to_string_pretty(&created)?);
            }
            PayoutCommands::Get { id } => {
                let payout = client.payouts().get(&id).await?;
                println!("{}", serde_json::to_string_pretty(&payout)?);
            }
        },

        Commands::MerchantAccount { action } => match action {
            MerchantAccountCommands::List => {
                let accounts = client.merchant_accounts().list().await?;
                for account in &accounts {
                    eprintln!(
                        "{} {} available {}",
                        account.id,
                        account.currency,
                        account.display_available_balance()
                    );
                }
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            }
            MerchantAccountCommands::Get { id } => {
                let account = client.merchant_accounts().get(&id).await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
        },

        Commands::Provider { action } => match action {
            ProviderCommands::Get { id } => {
                let provider = client.providers().get(&id).await?;
                println!("{}", serde_json::to_string_pretty(&provider)?);
            }
        },
    }

    Ok(())
}
