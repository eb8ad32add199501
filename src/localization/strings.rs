use std::collections::{HashMap, HashSet};

lazy_static::lazy_static! {
    /// User-facing replies. Each one carries the Shona line and its English gloss.
    pub static ref BILINGUAL_STRINGS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        m.insert(
            "message_welcome",
            "🇿🇼 *Mauya ku Chokwadi AI!* 🇿🇼\n\
             _Welcome to Chokwadi AI!_\n\n\
             Ndiri AI inokubatsira kuziva kana zvaunoona pa internet zviri zvechokwadi kana kwete.\n\
             (I'm an AI that helps you check if what you see online is true or false.)\n\n\
             📱 *Tumira chero chimwe chezvinhu izvi:*\n\
             (Send me any of the following:)\n\n\
             📝 Text message / WhatsApp forward\n\
             🖼️ Screenshot or image\n\
             🎤 Voice note\n\
             🔗 Link/URL\n\n\
             Ndichaongorora ndikuudze kana zviri zvechokwadi! ✅\n\
             (I'll analyse it and tell you if it's credible!)\n\n\
             _Basa rangu (What I check):_\n\
             • Nhau dzenhema (Fake news)\n\
             • Scams ne fraud (EcoCash, investment scams)\n\
             • Fake government notices\n\
             • Health misinformation\n\
             • Phishing links\n\n\
             Tumira message yako izvozvi! 👇\n\
             (Send your message now!)\n\n\
             🇿🇼 _Chokwadi AI - Zvokwadi Zvinobatsira (The truth helps)_",
        );

        m.insert(
            "message_apology",
            "🔍 *CHOKWADI AI*\n\n\
             ⚠️ Pane dambudziko rekutarisa content iyi panguva ino. \
             (We're experiencing a temporary issue analysing this content.)\n\n\
             Edza zvakare mushure menguva shoma. (Please try again shortly.)\n\n\
             🇿🇼 _Chokwadi AI - Zvokwadi Zvinobatsira_",
        );

        m.insert(
            "message_text_too_short",
            "📝 Ndapota tumira message yakareba kuti ndikwanise kuiongorora.\n\
             (Please send a longer message for me to analyse.)\n\n\
             Tumira 'help' kuti uwane rubatsiro. (Send 'help' for assistance.)",
        );

        m.insert(
            "message_voice_failed",
            "⚠️ Handina kukwanisa kunzwa voice note yacho. \
             (I couldn't process this voice note. \
             Please try sending it again or send the information as text.)",
        );

        m.insert(
            "message_image_missing",
            "⚠️ Handina kukwanisa kuona mufananidzo wacho. \
             (I couldn't access the image. Please try again.)",
        );

        m.insert(
            "message_processing_error",
            "⚠️ Pane dambudziko rekutarisa content iyi. \
             (There was an error processing your request. Please try again.)\n\n\
             🇿🇼 _Chokwadi AI_",
        );

        // Scan report lines
        m.insert("report_scan_header", "AUTOMATED SECURITY SCAN RESULTS:");
        m.insert("report_risk_level", "Risk Level");
        m.insert("report_issues_found", "Issues found:");
        m.insert(
            "report_known_domain",
            "✅ Domain is a known legitimate Zimbabwean website",
        );

        // Admin replies
        m.insert("admin_status_title", "⚙️ *Chokwadi AI Status*");
        m.insert("admin_switched_auto", "✅ Switched to *auto mode* (Claude → GPT fallback)");

        m
    };

    pub static ref GREETING_WORDS: HashSet<&'static str> = [
        "hi", "hello", "help", "start", "menu",
        "mauya", "salibonani", "ndeipi", "hey", "howzit",
        "maswera sei", "makadii", "kunjani",
    ]
    .into_iter()
    .collect();
}
