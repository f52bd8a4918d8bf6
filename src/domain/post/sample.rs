// Built-in feed shown when no backend is configured or reachable.
use super::entity::{AudioLayer, Post};

fn tags(values: &[&str]) -> Vec<String> {
	values.iter().map(|v| v.to_string()).collect()
}

pub fn sample_posts() -> Vec<Post> {
	vec![
		Post {
			id: "1".into(),
			username: "Jordan_Lux".into(),
			avatar: "https://picsum.photos/seed/jordan/200/200".into(),
			thumbnail: "https://images.unsplash.com/photo-1545128485-c400e7702796?auto=format&fit=crop&w=600&q=80".into(),
			description: "Création d'un setup néon pour l'app Peperr ! Qu'en pensez-vous ? ✨ #design #future".into(),
			hashtags: tags(&["design", "future", "peperr"]),
			spice_count: 82_000,
			comments: 1_200,
			shares: 450,
			seeded_age: Some("2h".into()),
			mood: Some("cyberpunk".into()),
			audio_layers: vec![
				AudioLayer::new("main", "Beat Principal", 1.0, 0.0, false),
				AudioLayer::new("bass", "Bass Line", 0.8, -0.3, false),
				AudioLayer::new("secret", "🔥 Secret Drop", 0.6, 0.8, true),
			],
			..Default::default()
		},
		Post {
			id: "2".into(),
			username: "dj_pepper".into(),
			avatar: "https://picsum.photos/seed/dj/200/200".into(),
			thumbnail: "https://images.unsplash.com/photo-1508700115892-45ecd05ae2ad?auto=format&fit=crop&w=600&q=80".into(),
			description: "Nouveau mix disponible. Préparez-vous à transpirer ! 🎧🔥".into(),
			hashtags: tags(&["afrobeats", "dance", "fire"]),
			spice_count: 15_400,
			comments: 890,
			shares: 450,
			seeded_age: Some("5h".into()),
			mood: Some("vintage".into()),
			audio_layers: vec![
				AudioLayer::new("main", "Afro Beat", 1.0, 0.0, false),
				AudioLayer::new("vocals", "Vocals", 0.9, 0.2, false),
			],
			..Default::default()
		},
		Post {
			id: "3".into(),
			username: "neon_queen".into(),
			avatar: "https://picsum.photos/seed/neon/200/200".into(),
			thumbnail: "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?auto=format&fit=crop&w=600&q=80".into(),
			description: "Vaporwave vibes only 💜🌴 Le futur c'est maintenant".into(),
			hashtags: tags(&["vaporwave", "aesthetic", "retro"]),
			spice_count: 45_000,
			comments: 2_100,
			shares: 890,
			seeded_age: Some("1h".into()),
			mood: Some("vaporwave".into()),
			audio_layers: vec![AudioLayer::new("synth", "Synth Wave", 1.0, 0.0, false)],
			..Default::default()
		},
	]
}
