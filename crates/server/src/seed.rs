//! One-shot database seeding for demos and manual testing. Wipes every table
//! and repopulates it with a small fixture set.

use chrono::{DateTime, Duration, Utc};

use crate::db::Database;

struct SeedProject {
    title: &'static str,
    description: &'static str,
    genre: &'static str,
    bpm: i64,
    key: &'static str,
    creator_id: i64,
    needs: Vec<&'static str>,
    monetization_type: &'static str,
    bounty_amount: Option<f64>,
    bounty_deadline: Option<DateTime<Utc>>,
    is_unlockable: bool,
    unlock_price: Option<f64>,
    created_at: DateTime<Utc>,
}

pub async fn seed_database(db: &Database) -> anyhow::Result<()> {
    let pool = &db.pool;
    let now = Utc::now();

    // Clear existing data, children first
    for table in [
        "project_files",
        "project_comments",
        "project_collaborators",
        "projects",
        "users",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(pool)
            .await?;
    }
    // Reset autoincrement counters; the table only exists once something
    // has been inserted, so a failure here is fine.
    let _ = sqlx::query("DELETE FROM sqlite_sequence").execute(pool).await;

    let users = [
        ("alex_producer", "alex@example.com"),
        ("sarah_vocalist", "sarah@example.com"),
        ("mike_guitarist", "mike@example.com"),
        ("emma_mixer", "emma@example.com"),
        ("david_drummer", "david@example.com"),
    ];

    for (username, email) in &users {
        sqlx::query(
            "INSERT INTO users (email, username, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(username)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;
    }

    let projects = vec![
        SeedProject {
            title: "Midnight Vibes",
            description: "Lo-fi hip hop track with dreamy synths, looking for a vocalist to complete this chill masterpiece",
            genre: "Lo-fi Hip Hop",
            bpm: 85,
            key: "Am",
            creator_id: 1,
            needs: vec!["Vocalist", "Mix Engineer"],
            monetization_type: "bounty",
            bounty_amount: Some(150.0),
            bounty_deadline: Some(now + Duration::days(14)),
            is_unlockable: false,
            unlock_price: None,
            created_at: now - Duration::hours(2),
        },
        SeedProject {
            title: "Electric Dreams",
            description: "Synthwave anthem with retro vibes, need guitar and bass to bring the 80s energy",
            genre: "Synthwave",
            bpm: 120,
            key: "Dm",
            creator_id: 2,
            needs: vec!["Guitarist", "Bassist"],
            monetization_type: "free",
            bounty_amount: None,
            bounty_deadline: None,
            is_unlockable: false,
            unlock_price: None,
            created_at: now - Duration::hours(5),
        },
        SeedProject {
            title: "Summer Breeze",
            description: "Chill pop track perfect for summer playlists, looking for a producer to polish the sound",
            genre: "Pop",
            bpm: 110,
            key: "C",
            creator_id: 3,
            needs: vec!["Producer"],
            monetization_type: "bounty",
            bounty_amount: Some(200.0),
            bounty_deadline: Some(now + Duration::days(21)),
            is_unlockable: false,
            unlock_price: None,
            created_at: now - Duration::days(1),
        },
        SeedProject {
            title: "Urban Nights",
            description: "Hip hop beat with jazz influences, seeking a rapper and mix engineer",
            genre: "Hip Hop",
            bpm: 95,
            key: "Gm",
            creator_id: 4,
            needs: vec!["Rapper", "Mix Engineer"],
            monetization_type: "unlockable",
            bounty_amount: None,
            bounty_deadline: None,
            is_unlockable: true,
            unlock_price: Some(5.0),
            created_at: now - Duration::hours(8),
        },
        SeedProject {
            title: "Acoustic Sunset",
            description: "Indie folk song with beautiful melodies, need a vocalist and harmonica player",
            genre: "Indie Folk",
            bpm: 75,
            key: "D",
            creator_id: 5,
            needs: vec!["Vocalist", "Harmonica"],
            monetization_type: "free",
            bounty_amount: None,
            bounty_deadline: None,
            is_unlockable: false,
            unlock_price: None,
            created_at: now - Duration::hours(12),
        },
    ];

    for project in &projects {
        sqlx::query(
            r#"
            INSERT INTO projects (
                title, description, genre, bpm, key, creator_id, collaboration_needs,
                monetization_type, bounty_amount, bounty_deadline, is_unlockable,
                unlock_price, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'active', ?, ?)
            "#,
        )
        .bind(project.title)
        .bind(project.description)
        .bind(project.genre)
        .bind(project.bpm)
        .bind(project.key)
        .bind(project.creator_id)
        .bind(serde_json::to_string(&project.needs)?)
        .bind(project.monetization_type)
        .bind(project.bounty_amount)
        .bind(project.bounty_deadline)
        .bind(project.is_unlockable)
        .bind(project.unlock_price)
        .bind(project.created_at)
        .bind(project.created_at)
        .execute(pool)
        .await?;
    }

    let collaborators = [
        (1, 2, "Vocalist", "pending"),
        (1, 4, "Mix Engineer", "accepted"),
        (2, 3, "Guitarist", "accepted"),
        (3, 1, "Producer", "pending"),
        (3, 5, "Additional Producer", "accepted"),
    ];

    for (project_id, user_id, role, status) in &collaborators {
        sqlx::query(
            r#"
            INSERT INTO project_collaborators (project_id, user_id, role, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(role)
        .bind(status)
        .bind(now)
        .execute(pool)
        .await?;
    }

    let comments: [(i64, i64, &str, Option<f64>); 5] = [
        (
            1,
            2,
            "Love the vibe! I can definitely add some vocals to this. When do you need it by?",
            Some(45.5),
        ),
        (
            1,
            4,
            "The mix is coming along nicely. Just need to work on the low end a bit more.",
            None,
        ),
        (
            2,
            3,
            "Added some guitar layers. Check out the new version!",
            Some(120.0),
        ),
        (
            3,
            1,
            "This has great potential. I can help with the production if you're interested.",
            None,
        ),
        (
            3,
            5,
            "The melody is catchy! Would love to collaborate on this.",
            None,
        ),
    ];

    for (project_id, user_id, content, timestamp) in &comments {
        sqlx::query(
            r#"
            INSERT INTO project_comments (project_id, user_id, content, timestamp, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(content)
        .bind(timestamp)
        .bind(now)
        .execute(pool)
        .await?;
    }

    tracing::info!("Database seeded successfully");
    tracing::info!("Created {} users", users.len());
    tracing::info!("Created {} projects", projects.len());
    tracing::info!("Created {} collaborations", collaborators.len());
    tracing::info!("Created {} comments", comments.len());

    Ok(())
}
