//! Starter catalog shown on a fresh dashboard.

use super::auth::Role;
use super::posts::{Category, Post, PostStatus, PostsState};

fn category(id: u32, name: &str) -> Category {
    Category { id, name: name.to_owned(), slug: name.to_lowercase() }
}

#[must_use]
pub fn categories() -> Vec<Category> {
    vec![
        category(1, "Technology"),
        category(2, "Design"),
        category(3, "Business"),
        category(4, "Lifestyle"),
    ]
}

fn post(id: u32, title: &str, excerpt: &str, content: &str, category_id: u32, status: PostStatus, day: u32) -> Post {
    let stamp = format!("2025-11-{day:02}T10:00:00Z");
    Post {
        id,
        title: title.to_owned(),
        content: content.to_owned(),
        excerpt: excerpt.to_owned(),
        category_id,
        status,
        created_at: stamp.clone(),
        updated_at: stamp,
    }
}

#[must_use]
pub fn admin_posts() -> Vec<Post> {
    use PostStatus::{Draft, Published};
    vec![
        post(
            1,
            "Getting Started with Next.js 16",
            "Learn the fundamentals of the latest Next.js version and explore its powerful features",
            "Next.js 16 introduces exciting new features...",
            1,
            Published,
            15,
        ),
        post(
            2,
            "Modern UI Design Principles",
            "Creating beautiful and functional user interfaces with cutting-edge design patterns",
            "Design principles that stand the test of time...",
            2,
            Published,
            14,
        ),
        post(
            3,
            "Building Scalable APIs",
            "Best practices for API development that scale with your business",
            "Learn how to build APIs that scale...",
            1,
            Draft,
            13,
        ),
        post(
            4,
            "The Future of Web Development",
            "Exploring emerging trends and technologies shaping the web",
            "The web is evolving rapidly...",
            1,
            Published,
            12,
        ),
        post(
            5,
            "Minimalist Design Trends",
            "Less is more: embracing simplicity in modern design",
            "Minimalism in design...",
            2,
            Draft,
            11,
        ),
    ]
}

#[must_use]
pub fn editor_posts() -> Vec<Post> {
    use PostStatus::{Draft, Published};
    vec![
        post(
            1,
            "Getting Started with React Hooks",
            "A comprehensive guide to understanding and using React Hooks effectively",
            "React Hooks have revolutionized...",
            1,
            Published,
            15,
        ),
        post(
            2,
            "CSS Grid vs Flexbox",
            "Understanding when to use Grid and when to use Flexbox",
            "Both are powerful layout tools...",
            2,
            Draft,
            14,
        ),
        post(
            3,
            "TypeScript Best Practices",
            "Write better, safer TypeScript code",
            "TypeScript provides amazing type safety...",
            1,
            Published,
            13,
        ),
    ]
}

/// Catalog for the dashboard of `role`.
#[must_use]
pub fn catalog_for(role: Role) -> PostsState {
    let posts = match role {
        Role::Admin => admin_posts(),
        Role::Editor => editor_posts(),
    };
    PostsState::new(posts, categories())
}
