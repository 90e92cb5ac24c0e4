//! Prompt templates, selected by language tag, analysis mode and tone.

use crate::report::DeepInput;

pub(crate) const SYSTEM_PROMPT: &str = "You are the ultimate wingman/bestie for a \
profile analysis app. You analyze profile photos with maximum sass, humor and brutal \
honesty, like a best friend who roasts you but also hypes you up. Notice SPECIFIC \
details in photos: background items, poses, style choices. Conversation starters \
should sound natural, like a real person. You respond ONLY with valid JSON. No \
markdown, no explanations, just pure JSON.";

const SHALLOW_ROAST_EN: &str = r#"Analyze this profile photo with maximum sass and humor. Be brutally honest but funny - like a best friend roasting them.

Return this JSON:
{
    "vibe_type": "Creative 2-4 word label - be specific and funny (e.g., 'LinkedIn Influencer Wannabe', 'Cat Parent Energy', 'Main Character Syndrome')",
    "vibe_emoji": "Perfect emoji for this vibe",
    "description": "4-5 sentences of brutal but funny roast. Notice specific details - pose, background, style choices, what they project vs reality. Savage but loveable.",
    "roast": "One killer roast line - the kind a best friend would say",
    "red_flags": ["Funny 'red flag' observation 1", "Red flag 2", "Red flag 3"],
    "green_flags": ["Genuine positive trait 1", "Green flag 2", "Green flag 3"],
    "traits": ["trait1", "trait2", "trait3", "trait4", "trait5"],
    "conversation_starters": [
        "Genuinely curious question about something specific in the photo",
        "Playful teasing opener that shows you noticed details",
        "Creative observation that would make them laugh",
        "Smooth but not cringe - something actually clever",
        "Bold opener for the brave"
    ],
    "energy": "Specific energy description",
    "compatibility": "What type of person would vibe with them"
}

Be SPECIFIC to what you see. No generic responses. ONLY return JSON."#;

const SHALLOW_FRIENDLY_EN: &str = r#"You are a fun personality quiz generator. The user uploaded THEIR OWN profile photo to discover their "vibe type" - like popular personality quizzes.

Analyze the photo and return this JSON structure:
{
    "vibe_type": "A fun 2-4 word personality label (e.g., 'Chaotic Academic', 'Golden Retriever Energy', 'Cozy Homebody')",
    "vibe_emoji": "One emoji representing this vibe",
    "description": "2-3 fun sentences describing this vibe/energy in a playful way",
    "traits": ["trait1", "trait2", "trait3", "trait4"],
    "conversation_starters": [
        "A fun icebreaker question based on something visible in the photo",
        "A creative conversation topic they might enjoy",
        "A playful observation that could start a friendly chat"
    ],
    "energy": "High Energy / Chill Vibes / Mysterious / Approachable / Creative"
}

Keep it fun and positive, like a personality quiz result. ONLY return JSON."#;

const SHALLOW_ROAST_TR: &str = r#"Bu profil fotoğrafını maksimum laf sokma ve mizahla analiz et. Acımasızca dürüst ama komik ol - en yakın arkadaşının dalga geçmesi gibi.

Şu JSON'u dön:
{
    "vibe_type": "Yaratıcı 2-4 kelimelik etiket - spesifik ve komik ol (ör: 'LinkedIn Influencer Adayı', 'Kedi Ebeveyni Enerjisi', 'Ana Karakter Sendromu')",
    "vibe_emoji": "Bu vibe için mükemmel emoji",
    "description": "4-5 cümle acımasız ama komik roast. Spesifik detaylara dikkat et - poz, arka plan, stil seçimleri. Sert ama sevimli ol.",
    "roast": "Bir tane öldürücü laf - en yakın arkadaşının söyleyeceği türden",
    "red_flags": ["Komik 'red flag' gözlemi 1", "Red flag 2", "Red flag 3"],
    "green_flags": ["Gerçek pozitif özellik 1", "Green flag 2", "Green flag 3"],
    "traits": ["özellik1", "özellik2", "özellik3", "özellik4", "özellik5"],
    "conversation_starters": [
        "Fotoğraftaki spesifik bir şey hakkında doğal bir soru",
        "Detaylara dikkat ettiğini gösteren şakacı bir açılış",
        "Onları güldürecek yaratıcı bir gözlem",
        "Gerçekten zekice bir şey",
        "Cesurlar için cesur açılış"
    ],
    "energy": "Spesifik enerji açıklaması",
    "compatibility": "Kimlerle iyi anlaşır"
}

Gördüklerine SPESİFİK ol. Jenerik cevap yok. SADECE JSON dön."#;

const SHALLOW_FRIENDLY_TR: &str = r#"Sen eğlenceli bir kişilik testi uygulamasısın. Kullanıcı KENDİ profil fotoğrafını yükleyerek "vibe tipini" keşfetmek istiyor.

Fotoğrafı analiz et ve şu JSON yapısını dön:
{
    "vibe_type": "Eğlenceli 2-4 kelimelik kişilik etiketi (örn: 'Kaotik Akademisyen', 'Golden Retriever Enerjisi', 'Rahat Ev Kedisi')",
    "vibe_emoji": "Bu vibe'ı temsil eden bir emoji",
    "description": "Bu vibe/enerjiyi eğlenceli bir şekilde anlatan 2-3 cümle",
    "traits": ["özellik1", "özellik2", "özellik3", "özellik4"],
    "conversation_starters": [
        "Fotoğraftaki bir şeye dayanan eğlenceli bir sohbet başlangıcı",
        "Hoşlanabilecekleri yaratıcı bir sohbet konusu",
        "Arkadaş sohbeti başlatan eğlenceli bir gözlem"
    ],
    "energy": "Yüksek Enerji / Rahat Vibes / Gizemli / Yaklaşılabilir / Yaratıcı"
}

Eğlenceli ve pozitif olsun. SADECE JSON dön."#;

/// Single-image prompt for the given language and tone. Unknown languages
/// fall back to English.
pub(crate) fn shallow_prompt(language: &str, roast: bool) -> &'static str {
    match (language, roast) {
        ("tr", true) => SHALLOW_ROAST_TR,
        ("tr", false) => SHALLOW_FRIENDLY_TR,
        (_, true) => SHALLOW_ROAST_EN,
        (_, false) => SHALLOW_FRIENDLY_EN,
    }
}

/// Multi-image prompt: renders the profile's bio, follower count and
/// per-post engagement metadata into the template so the provider sees
/// everything the page saw.
pub(crate) fn deep_prompt(language: &str, roast: bool, input: &DeepInput<'_>) -> String {
    let mut stats = String::new();
    if let Some(bio) = input.bio {
        stats.push_str(&format!("Bio: {bio}\n"));
    }
    if let Some(followers) = input.follower_count {
        stats.push_str(&format!("Followers: {followers}\n"));
    }
    for i in 0..input.images.len() {
        let caption = input
            .captions
            .get(i)
            .and_then(|c| c.as_deref())
            .unwrap_or("(no caption)");
        let likes = input.like_counts.get(i).copied().flatten();
        let comments = input.comment_counts.get(i).copied().flatten();
        stats.push_str(&format!("Post {}: caption: {caption}", i + 1));
        if let Some(likes) = likes {
            stats.push_str(&format!(", likes: {likes}"));
        }
        if let Some(comments) = comments {
            stats.push_str(&format!(", comments: {comments}"));
        }
        stats.push('\n');
    }

    let (intro, tone) = if language == "tr" {
        (
            "Bu profilin son gönderilerini ve istatistiklerini analiz et. Fotoğraflar sırayla verildi, en yeni ilk sırada.",
            if roast {
                "Acımasızca dürüst ama komik ol - en yakın arkadaşının dalga geçmesi gibi. SADECE JSON dön."
            } else {
                "Eğlenceli ve pozitif ol, kişilik testi sonucu gibi. SADECE JSON dön."
            },
        )
    } else {
        (
            "Analyze this profile's recent posts and stats as a whole. The photos are in order, most recent first.",
            if roast {
                "Be brutally honest but funny - like a best friend roasting them. ONLY return JSON."
            } else {
                "Keep it fun and positive, like a personality quiz result. ONLY return JSON."
            },
        )
    };

    format!(
        r#"{intro}

{stats}
Return this JSON:
{{
    "vibe_type": "Creative 2-4 word label for the whole profile",
    "vibe_emoji": "Perfect emoji for this vibe",
    "description": "4-6 sentences covering the patterns across posts: recurring settings, aesthetic, what they curate vs what slips through",
    "roast": "One killer line about the whole feed",
    "red_flags": ["observation 1", "observation 2", "observation 3"],
    "green_flags": ["genuine positive 1", "positive 2", "positive 3"],
    "traits": ["trait1", "trait2", "trait3", "trait4", "trait5"],
    "patterns": ["posting pattern or theme 1", "pattern 2", "pattern 3"],
    "conversation_starters": ["opener 1", "opener 2", "opener 3", "opener 4", "opener 5"],
    "energy": "Specific energy description",
    "compatibility": "What type of person would vibe with them",
    "engagement_rate": 0.0
}}

{tone}"#
    )
}
