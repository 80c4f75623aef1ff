//! Demo binary for the BookmarkDock core.
//!
//! Wires an in-memory bookmark store through the full stack:
//! 1. Change notifications are collapsed into single-flight refreshes
//! 2. The cache is swapped atomically and a sync event is broadcast
//! 3. Both view surfaces re-derive their display lists and redraw

use anyhow::Result;
use bookmark_dock::prelude::*;
use bookmark_dock::sync::SyncCoordinatorBuilder;
use bookmark_dock::ui::{dark_mode_enabled, MemoryKeyValueStore, DARK_MODE_KEY};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn sample_tree() -> TreeSnapshot {
    TreeSnapshot(vec![BookmarkNode::Folder {
        id: "0".to_string(),
        title: String::new(),
        children: vec![
            BookmarkNode::Folder {
                id: "1".to_string(),
                title: "Pets".to_string(),
                children: vec![
                    BookmarkNode::Bookmark {
                        id: "2".to_string(),
                        title: "Cat pictures".to_string(),
                        url: "http://cats.com/pictures".to_string(),
                    },
                    BookmarkNode::Bookmark {
                        id: "3".to_string(),
                        title: "Dog pictures".to_string(),
                        url: "http://dogs.com/pictures".to_string(),
                    },
                ],
            },
            BookmarkNode::Bookmark {
                id: "4".to_string(),
                title: "News".to_string(),
                url: "http://news.example".to_string(),
            },
        ],
    }])
}

fn print_items(label: &str, items: &[DisplayItem]) {
    println!("{label}:");
    for item in items {
        match item {
            DisplayItem::Folder {
                title,
                depth,
                bookmark_count,
                ..
            } => println!("{}📁 {title} ({bookmark_count})", "  ".repeat(depth + 1)),
            DisplayItem::Bookmark {
                title,
                hostname,
                depth,
                ..
            } => println!("{}🔗 {title} [{hostname}]", "  ".repeat(depth + 1)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bookmark_dock=debug".parse()?),
        )
        .init();

    println!("=== BookmarkDock core demo ===\n");

    let store = Arc::new(MemoryStore::new(sample_tree()));
    let coordinator = SyncCoordinatorBuilder::new(store.clone() as Arc<dyn BookmarkStore>)
        .debounce_window(Duration::from_millis(100))
        .build();

    // Startup sync, as the background process does on launch.
    coordinator.refresh().await;

    let router = MessageRouter::new(coordinator.clone(), Arc::new(NoopNavigator), "manager.html");
    let messenger = Arc::new(LocalMessenger::new(router));

    // Dark mode: stored flag OR the OS color-scheme signal.
    let kv = MemoryKeyValueStore::new(HashMap::from([(
        DARK_MODE_KEY.to_string(),
        "true".to_string(),
    )]));
    println!("dark mode: {}\n", dark_mode_enabled(&kv, false));

    // Mini panel: flat saved list, then the tree tab with a folder open.
    let mut panel = MiniPanelView::new(
        messenger.clone(),
        store.clone() as Arc<dyn BookmarkStore>,
    );
    panel.set_redraw_callback(Box::new(|| println!("[mini panel] redraw requested")));
    let panel_listener = panel.attach_sync_listener(coordinator.broadcaster().subscribe());
    panel.load().await;

    print_items("mini panel / saved tab", &panel.display().await);
    panel.switch_tab(PanelTab::Bookmarks).await;
    panel.toggle_folder("1").await;
    print_items("\nmini panel / tree tab (Pets expanded)", &panel.display().await);

    // Manager: stats plus a search.
    let manager = ManagerView::new(messenger.clone(), store.clone() as Arc<dyn BookmarkStore>);
    let manager_listener = manager.attach_sync_listener(coordinator.broadcaster().subscribe());
    manager.load().await;

    let stats = manager.stats().await;
    println!(
        "\nmanager stats: {} bookmarks, {} folders, {} showing",
        stats.bookmarks, stats.folders, stats.showing
    );
    manager.set_query("cat").await;
    print_items("manager / search \"cat\"", &manager.display().await);
    manager.clear_query().await;

    // Simulate an external change: the store gains a bookmark and emits
    // a burst of notifications; the coordinator collapses the refreshes.
    println!("\n--- external change: new bookmark created ---\n");
    let new_node = BookmarkNode::Bookmark {
        id: "5".to_string(),
        title: "Ferret care".to_string(),
        url: "http://ferrets.example/care".to_string(),
    };
    let mut tree = sample_tree();
    if let Some(BookmarkNode::Folder { children, .. }) = tree.0.first_mut() {
        children.push(new_node.clone());
    }
    store.set_tree(tree).await;

    for _ in 0..3 {
        coordinator
            .handle_store_event(BookmarkEvent::Created {
                id: "5".to_string(),
                node: new_node.clone(),
            })
            .await;
    }

    // Let the trailing refresh fire and the listeners settle.
    tokio::time::sleep(Duration::from_millis(300)).await;

    print_items("\nmini panel / saved tab after sync", &panel.display().await);
    println!("\nstore fetches performed: {}", store.fetch_count());

    panel_listener.abort();
    manager_listener.abort();
    println!("\nDone!");

    Ok(())
}
