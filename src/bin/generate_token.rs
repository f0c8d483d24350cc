//! Mint an API token signed with `JWT_KEY`.
//!
//! ```text
//! JWT_KEY=secret generate-token --user-id 1 --username exampleUser --admin
//! ```

use clap::Parser;

use car_api_server::auth::token::{self, TokenClaims};

#[derive(Debug, Parser)]
#[command(name = "generate-token", about = "Print a signed API token")]
struct Args {
    /// Id of the user the token is for
    #[arg(long, default_value_t = 1)]
    user_id: u64,

    /// Username embedded in the token
    #[arg(long, default_value = "exampleUser")]
    username: String,

    /// Mark the token holder as an administrator
    #[arg(long)]
    admin: bool,

    /// HS256 signing secret
    #[arg(long, env = "JWT_KEY", hide_env_values = true)]
    jwt_key: String,
}

fn main() -> anyhow::Result<()> {
    // Try to load .env file if it exists (does nothing if not found)
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let claims = TokenClaims::new(args.user_id, args.username, args.admin);
    let token = token::sign(&claims, &args.jwt_key)?;

    println!("{token}");
    Ok(())
}
