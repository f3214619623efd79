//! Command parsing and execution.

use anyhow::{anyhow, bail, Context, Result};
use futures::stream::{self, StreamExt};
use tracing::warn;

use foodtales_core::{ApiClient, Config, LoginRequest, SessionStore};

use crate::format::{format_date, or_placeholder, truncate_string};

/// Maximum concurrent API requests when fetching restaurant menus.
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Width of post/comment previews in list output.
const PREVIEW_WIDTH: usize = 60;

pub const USAGE: &str = "\
Usage: foodtales <command>

Commands:
  login [email]      Sign in (defaults to the last email used)
  logout             Sign out and forget the stored session
  whoami             Show the signed-in user
  posts              List posts
  comments <postId>  List comments on a post
  restaurants        List restaurants
  menu               List every restaurant with its dishes
  help               Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(Option<String>),
    Logout,
    WhoAmI,
    Posts,
    Comments(i64),
    Restaurants,
    Menu,
    Help,
}

pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(name) = args.first() else {
        return Ok(Command::Help);
    };
    let rest = &args[1..];

    let command = match name.as_str() {
        "login" => Command::Login(rest.first().cloned()),
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "posts" => Command::Posts,
        "comments" => {
            let id = rest.first().ok_or_else(|| anyhow!("comments needs a post id"))?;
            Command::Comments(id.parse().with_context(|| format!("Invalid post id: {}", id))?)
        }
        "restaurants" => Command::Restaurants,
        "menu" => Command::Menu,
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("Unknown command: {}", other),
    };
    Ok(command)
}

pub async fn run(command: Command, api: &ApiClient, session: &SessionStore, config: &mut Config) -> Result<()> {
    match command {
        Command::Login(email) => login(api, session, config, email).await,
        Command::Logout => {
            session.sign_out();
            println!("Signed out.");
            Ok(())
        }
        Command::WhoAmI => {
            whoami(session);
            Ok(())
        }
        Command::Posts => posts(api).await,
        Command::Comments(post_id) => comments(api, post_id).await,
        Command::Restaurants => restaurants(api).await,
        Command::Menu => menu(api).await,
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

async fn login(api: &ApiClient, session: &SessionStore, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = email
        .or_else(|| config.last_email.clone())
        .ok_or_else(|| anyhow!("No email given and none remembered"))?;
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    let user = api
        .login_into(session, &LoginRequest::new(email.clone(), password))
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
    println!("Signed in as {} ({})", user.name, user.user_type);
    Ok(())
}

fn whoami(session: &SessionStore) {
    match session.state().user {
        Some(user) if session.state().is_authenticated() => {
            println!("{} <{}>", user.name, user.email);
            println!("  id:      {}", user.user_id);
            println!("  type:    {}", user.user_type);
            println!("  bio:     {}", or_placeholder(&user.bio, "(none)"));
            println!("  since:   {}", format_date(&user.created_at));
        }
        _ => println!("Not signed in."),
    }
}

async fn posts(api: &ApiClient) -> Result<()> {
    let posts = api.get_all_posts().await.map_err(|e| anyhow!(e.user_message()))?;
    if posts.is_empty() {
        println!("No posts yet.");
    }
    for post in posts {
        println!(
            "#{:<5} {} - {} ({})",
            post.post_id,
            post.title,
            or_placeholder(&post.user_name, "unknown"),
            format_date(&post.created_date)
        );
        if !post.content.is_empty() {
            println!("       {}", truncate_string(&post.content, PREVIEW_WIDTH));
        }
    }
    Ok(())
}

async fn comments(api: &ApiClient, post_id: i64) -> Result<()> {
    let comments = api
        .get_comments_by_post_id(post_id)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    if comments.is_empty() {
        println!("No comments on post #{}.", post_id);
    }
    for comment in comments {
        println!(
            "{} ({}): {}",
            or_placeholder(&comment.user_name, "unknown"),
            format_date(&comment.comment_date),
            truncate_string(&comment.content, PREVIEW_WIDTH)
        );
    }
    Ok(())
}

async fn restaurants(api: &ApiClient) -> Result<()> {
    let restaurants = api.get_all_restaurants().await.map_err(|e| anyhow!(e.user_message()))?;
    for r in restaurants {
        println!(
            "#{:<5} {:<30} {:<6} {}",
            r.restaurant_id,
            truncate_string(&r.name, 30),
            r.status,
            r.coordinates()
        );
    }
    Ok(())
}

async fn menu(api: &ApiClient) -> Result<()> {
    let restaurants = api.get_all_restaurants().await.map_err(|e| anyhow!(e.user_message()))?;

    let menus: Vec<_> = stream::iter(restaurants)
        .map(|restaurant| {
            let api = api.clone();
            async move {
                let foods = api.get_foods_by_restaurant_id(restaurant.restaurant_id).await;
                (restaurant, foods)
            }
        })
        .buffered(MAX_CONCURRENT_REQUESTS)
        .collect()
        .await;

    for (restaurant, foods) in menus {
        println!("{} [{}]", restaurant.name, restaurant.status);
        match foods {
            Ok(foods) if foods.is_empty() => println!("  (no dishes)"),
            Ok(foods) => {
                for food in foods {
                    let marker = if food.is_available() { " " } else { "x" };
                    println!("  {} {:<30} {:>10}", marker, truncate_string(&food.name, 30), food.display_price());
                }
            }
            Err(e) => {
                warn!(restaurant_id = restaurant.restaurant_id, error = %e, "Failed to fetch dishes");
                println!("  (dishes unavailable: {})", e.user_message());
            }
        }
    }
    Ok(())
}
