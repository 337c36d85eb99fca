//! Example: Pull entries from the public Contentful demo space
//!
//! Run with: cargo run -p contentkit --example pull_demo
//!
//! Uses the well-known public demo space credentials, so no setup is
//! required.

use contentkit::{Client, ImageOptions, LocaleFilter, Query};

#[tokio::main]
async fn main() {
    let client = match Client::builder()
        .space("cfexampleapi")
        .token("b4c0n73n7fu1")
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let query = Query::builder()
        .content_type("cat")
        .content_field("name")
        .locale(LocaleFilter::All)
        .recursive(true)
        .build();

    let docs = match contentkit::pull(&client, &query).await {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("ContentKit Pull Demo");
    println!("====================\n");

    let mut count = 0;
    for doc in docs {
        count += 1;
        println!("{}. {} [{}]", count, doc.id(), doc.locale());
        println!("   Content: {}", doc.content);
        println!("   Fields: {}", doc.meta.len());

        if let Some(asset) = doc.assets().first() {
            let options = ImageOptions::new().with_width(200);
            if let Some(tag) = doc.image_tag(asset.id(), &options) {
                println!("   Image: {}", tag);
            }
        }
        println!();
    }

    println!("====================");
    println!("{} documents", count);
}
