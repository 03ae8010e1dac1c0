//! Command-line surface over the storefront client.

use clap::{Parser, Subcommand};
use savego::{
    filter::{ProductQuery, SortKey},
    session::Session,
};
use savego_app::{
    api::{ApiClient, ApiConfig, ApiError, Credentials, NewAccount, StorefrontApi},
    session_store::{JsonFileStorage, SessionStore},
};

type Sessions = SessionStore<JsonFileStorage>;

#[derive(Debug, Parser)]
#[command(name = "savego", about = "SaveGo storefront client", long_about = None)]
pub(crate) struct Cli {
    /// Storefront API base URL
    #[arg(
        long,
        env = "SAVEGO_API_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    api_url: String,

    /// Directory holding persisted client state
    #[arg(long, env = "SAVEGO_STATE_DIR", default_value = ".savego", global = true)]
    state_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List products, filtered and sorted locally
    Products {
        /// Free-text search over name, description, and category
        #[arg(long, default_value = "")]
        search: String,

        /// Restrict to a category id
        #[arg(long)]
        category: Option<u64>,

        /// Ordering: name_asc, name_desc, price_asc, price_desc
        #[arg(long, default_value = "name_asc")]
        sort: SortKey,
    },

    /// List categories
    Categories,

    /// Fetch search suggestions for a query
    Suggest {
        /// Partial query text
        query: String,
    },

    /// Authenticate and persist the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Create an account and log straight in
    Register {
        /// Account email
        #[arg(long)]
        email: String,

        /// Display username
        #[arg(long)]
        username: String,

        /// Account password
        #[arg(long)]
        password: String,

        /// Given name
        #[arg(long)]
        first_name: String,

        /// Family name
        #[arg(long)]
        last_name: String,
    },

    /// Clear the persisted session
    Logout,

    /// Show the current session
    Session,

    /// List the authenticated account's orders
    Orders,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let api = ApiClient::new(ApiConfig {
            base_url: self.api_url.clone(),
        });

        let mut sessions = SessionStore::open(JsonFileStorage::new(&self.state_dir))
            .map_err(|error| format!("failed to open session storage: {error}"))?;

        match self.command {
            Commands::Products {
                search,
                category,
                sort,
            } => {
                products(
                    &api,
                    ProductQuery {
                        search,
                        category,
                        sort,
                    },
                )
                .await
            }
            Commands::Categories => categories(&api).await,
            Commands::Suggest { query } => suggest(&api, query).await,
            Commands::Login { email, password } => {
                login(&api, &mut sessions, Credentials { email, password }).await
            }
            Commands::Register {
                email,
                username,
                password,
                first_name,
                last_name,
            } => {
                register(
                    &api,
                    &mut sessions,
                    NewAccount {
                        email,
                        username,
                        password,
                        first_name,
                        last_name,
                    },
                )
                .await
            }
            Commands::Logout => logout(&mut sessions),
            Commands::Session => {
                print_session(sessions.session());
                Ok(())
            }
            Commands::Orders => orders(&api, &mut sessions).await,
        }
    }
}

async fn products(api: &ApiClient, query: ProductQuery) -> Result<(), String> {
    let catalog = api
        .products()
        .await
        .map_err(|error| error.message().to_string())?;

    for product in query.apply(&catalog) {
        let category = product
            .category
            .as_ref()
            .map_or("-", |category| category.name.as_str());

        println!(
            "{:>5}  {:<40}  {:>10}  {:>5} in stock  [{category}]",
            product.id, product.name, product.price, product.stock_quantity
        );
    }

    Ok(())
}

async fn categories(api: &ApiClient) -> Result<(), String> {
    let categories = api
        .categories()
        .await
        .map_err(|error| error.message().to_string())?;

    for category in categories {
        println!("{:>5}  {}", category.id, category.name);
    }

    Ok(())
}

async fn suggest(api: &ApiClient, query: String) -> Result<(), String> {
    let suggestions = api
        .suggestions(query)
        .await
        .map_err(|error| error.message().to_string())?;

    for suggestion in suggestions {
        println!("{suggestion}");
    }

    Ok(())
}

async fn login(
    api: &ApiClient,
    sessions: &mut Sessions,
    credentials: Credentials,
) -> Result<(), String> {
    let auth = api
        .login(credentials)
        .await
        .map_err(|error| error.message().to_string())?;

    let username = auth.user.username.clone();

    sessions
        .login(auth.user, auth.access_token)
        .map_err(|error| format!("failed to persist session: {error}"))?;

    println!("logged in as {username}");

    Ok(())
}

async fn register(
    api: &ApiClient,
    sessions: &mut Sessions,
    account: NewAccount,
) -> Result<(), String> {
    let auth = api
        .register(account)
        .await
        .map_err(|error| error.message().to_string())?;

    let username = auth.user.username.clone();

    sessions
        .login(auth.user, auth.access_token)
        .map_err(|error| format!("failed to persist session: {error}"))?;

    println!("registered and logged in as {username}");

    Ok(())
}

fn logout(sessions: &mut Sessions) -> Result<(), String> {
    sessions
        .logout()
        .map_err(|error| format!("failed to persist session: {error}"))?;

    println!("logged out");

    Ok(())
}

async fn orders(api: &ApiClient, sessions: &mut Sessions) -> Result<(), String> {
    let token = sessions
        .session()
        .bearer_token()
        .ok_or("not logged in; run `savego login` first")?
        .to_string();

    let orders = match api.orders(token).await {
        Ok(orders) => orders,
        Err(error) => {
            // An expired token only surfaces here; drop the stale
            // session so the next attempt starts clean.
            if matches!(error, ApiError::Rejected { status: 401, .. }) {
                sessions
                    .logout()
                    .map_err(|error| format!("failed to persist session: {error}"))?;
            }

            return Err(error.message().to_string());
        }
    };

    for order in orders {
        println!(
            "{:<12}  {}  {:>10}  {}",
            order.order_number,
            order.created_at,
            order.total_amount,
            order.status.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

fn print_session(session: &Session) {
    match (&session.user, session.is_authenticated()) {
        (Some(user), true) => println!("logged in as {} <{}>", user.username, user.email),
        _ => println!("not logged in"),
    }
}
