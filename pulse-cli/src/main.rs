use std::path::PathBuf;

use clap::Parser;
use pulse_client::{ImageUpload, Page, Post, PulseApi, PulseClientHttp};
use uuid::Uuid;

#[derive(Parser, Debug)]
struct Cli {
    #[clap(short, long)]
    server: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    Register {
        #[clap(long)]
        username: String,
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    Login {
        #[clap(long)]
        username: String,
        #[clap(long)]
        password: String,
    },
    Index {
        #[clap(long)]
        page: Option<u32>,
    },
    Group {
        slug: String,
        #[clap(long)]
        page: Option<u32>,
    },
    Profile {
        username: String,
        #[clap(long)]
        page: Option<u32>,
    },
    Post {
        id: Uuid,
    },
    Create {
        #[clap(long)]
        text: String,
        #[clap(long)]
        group: Option<String>,
        #[clap(long)]
        image: Option<PathBuf>,
    },
    Edit {
        id: Uuid,
        #[clap(long)]
        text: String,
        #[clap(long)]
        group: Option<String>,
    },
    Comment {
        post_id: Uuid,
        #[clap(long)]
        text: String,
    },
    Feed {
        #[clap(long)]
        page: Option<u32>,
    },
    Follow {
        username: String,
    },
    Unfollow {
        username: String,
    },
}

fn print_page(page: &Page<Post>) {
    println!(
        "Page {}/{} ({} posts total)",
        page.number, page.total_pages, page.total_items
    );
    for post in &page.items {
        println!("- [{}] {} (by {})", post.id, post.text, post.author_id);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let endpoint = args.server.as_deref().unwrap_or("http://127.0.0.1:8080");
    let mut client = PulseClientHttp::connect(endpoint)?;

    match args.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            client.register(username, email, password).await?;
            println!("Successfully registered!");
        }
        Command::Login { username, password } => {
            client.login(username, password).await?;
            println!("Successfully logged in!");
        }
        Command::Index { page } => {
            let posts = client.index(page).await?;
            print_page(&posts);
        }
        Command::Group { slug, page } => {
            let listing = client.group_posts(&slug, page).await?;
            println!("{} ({})", listing.group.title, listing.group.slug);
            print_page(&listing.page);
        }
        Command::Profile { username, page } => {
            let profile = client.profile(&username, page).await?;
            match profile.following {
                Some(true) => println!("{} (following)", profile.author.username),
                Some(false) => println!("{} (not following)", profile.author.username),
                None => println!("{}", profile.author.username),
            }
            print_page(&profile.page);
        }
        Command::Post { id } => {
            let detail = client.post_detail(id).await?;
            println!("{}", detail.post.text);
            println!("Comments ({})", detail.comments.len());
            for comment in detail.comments {
                println!("- {} (by {})", comment.text, comment.author_id);
            }
        }
        Command::Create { text, group, image } => {
            let image = match image {
                Some(path) => {
                    let bytes = std::fs::read(&path)?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "upload".to_string());
                    Some(ImageUpload { file_name, bytes })
                }
                None => None,
            };
            let post = client.create_post(text, group, image).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::Edit { id, text, group } => {
            let post = client.edit_post(id, text, group).await?;
            println!("Post updated! ID: {}", post.id);
        }
        Command::Comment { post_id, text } => match client.add_comment(post_id, text).await? {
            Some(comment) => println!("Comment added! ID: {}", comment.id),
            None => println!("Comment rejected (must be 4-140 characters)"),
        },
        Command::Feed { page } => {
            let posts = client.feed(page).await?;
            print_page(&posts);
        }
        Command::Follow { username } => {
            client.follow(&username).await?;
            println!("Now following {username}");
        }
        Command::Unfollow { username } => {
            client.unfollow(&username).await?;
            println!("Unfollowed {username}");
        }
    }

    Ok(())
}
