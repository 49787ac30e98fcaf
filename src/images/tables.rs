//! Static lookup tables for the image fallback steps. Iteration order of
//! every table is significant: the first match wins.

/// Keyword sets matched as substrings of the lowercased product text.
pub const CATEGORY_IMAGES: &[(&[&str], &str)] = &[
    (
        &["laptop", "notebook", "elitebook", "thinkpad", "macbook", "ultrabook"],
        "https://images.unsplash.com/photo-1496181133206-80ce9b88a853?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["desktop", "workstation", "pc", "tower", "all-in-one"],
        "https://images.unsplash.com/photo-1587831990711-23ca6441447b?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["monitor", "display", "screen", "lcd", "led", "oled", "curved"],
        "https://images.unsplash.com/photo-1527443224154-c4a3942d3acf?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["printer", "impresora", "laserjet", "inkjet", "multifunc"],
        "https://images.unsplash.com/photo-1612815154858-60aa4c59eaa6?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["router", "switch", "firewall", "access point", "wifi", "ethernet"],
        "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["server", "servidor", "rack", "blade", "datacenter"],
        "https://images.unsplash.com/photo-1558494949-ef010cbdcc31?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["storage", "disk", "ssd", "hdd", "nas", "san", "drive"],
        "https://images.unsplash.com/photo-1597852074816-d933c7d2b988?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["tablet", "ipad", "surface", "android tablet"],
        "https://images.unsplash.com/photo-1544244015-0df4b3ffc6b0?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["smartphone", "phone", "iphone", "android", "mobile"],
        "https://images.unsplash.com/photo-1511707171634-5f897ff02aa9?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["camera", "webcam", "camara", "video"],
        "https://images.unsplash.com/photo-1606983340126-99ab4feaa64a?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["audio", "headset", "headphone", "auricular", "microphone", "speaker", "música"],
        "https://images.unsplash.com/photo-1545454675-3531b543be5d?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["cable", "adapter", "adaptador", "charger", "cargador", "hub"],
        "https://images.unsplash.com/photo-1625842268584-8f3296236761?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["keyboard", "mouse", "teclado", "raton", "trackpad"],
        "https://images.unsplash.com/photo-1541140532154-b024d705b90a?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["software", "license", "licencia", "windows", "office", "antivirus"],
        "https://images.unsplash.com/photo-1515879218367-8466d910aaa4?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["memory", "ram", "processor", "cpu", "gpu", "motherboard"],
        "https://images.unsplash.com/photo-1591799264318-7e6ef8ddb7ea?w=400&h=400&fit=crop&auto=format&q=80",
    ),
    (
        &["gaming", "gamer", "game", "xbox", "playstation"],
        "https://images.unsplash.com/photo-1552820728-8b83bb6b773f?w=400&h=400&fit=crop&auto=format&q=80",
    ),
];

/// Lowercase brand key to logo URL.
pub const BRAND_LOGOS: &[(&str, &str)] = &[
    ("hp", "https://upload.wikimedia.org/wikipedia/commons/2/29/HP_New_Logo_2D.svg"),
    ("hewlett packard", "https://upload.wikimedia.org/wikipedia/commons/2/29/HP_New_Logo_2D.svg"),
    ("dell", "https://upload.wikimedia.org/wikipedia/commons/4/48/Dell_Logo.svg"),
    ("cisco", "https://upload.wikimedia.org/wikipedia/commons/6/64/Cisco_logo.svg"),
    ("microsoft", "https://upload.wikimedia.org/wikipedia/commons/4/44/Microsoft_logo.svg"),
    ("lenovo", "https://upload.wikimedia.org/wikipedia/commons/4/45/Lenovo_Logo_2023.svg"),
    ("apple", "https://upload.wikimedia.org/wikipedia/commons/f/fa/Apple_logo_black.svg"),
    ("samsung", "https://upload.wikimedia.org/wikipedia/commons/2/24/Samsung_Logo.svg"),
    ("lg", "https://upload.wikimedia.org/wikipedia/commons/2/20/LG_symbol.svg"),
    ("asus", "https://upload.wikimedia.org/wikipedia/commons/9/96/Asus_logo_2023.svg"),
    ("acer", "https://upload.wikimedia.org/wikipedia/commons/5/5d/Acer_2011.svg"),
    ("intel", "https://upload.wikimedia.org/wikipedia/commons/0/0e/Intel_logo_2020.svg"),
    ("amd", "https://upload.wikimedia.org/wikipedia/commons/7/7c/AMD_Logo.svg"),
    ("nvidia", "https://upload.wikimedia.org/wikipedia/commons/5/58/Nvidia_logo.svg"),
    ("logitech", "https://upload.wikimedia.org/wikipedia/commons/7/75/Logitech_logo.svg"),
    ("kingston", "https://upload.wikimedia.org/wikipedia/commons/9/95/Kingston_Technology_logo.svg"),
    ("seagate", "https://upload.wikimedia.org/wikipedia/commons/8/8a/Seagate_Technology_logo.svg"),
    ("western digital", "https://upload.wikimedia.org/wikipedia/commons/2/2f/Western_Digital_logo.svg"),
    ("tp-link", "https://upload.wikimedia.org/wikipedia/commons/5/5c/TP-Link_Logo_2023.svg"),
    ("linksys", "https://upload.wikimedia.org/wikipedia/commons/0/04/Linksys_logo_2014.svg"),
    ("netgear", "https://upload.wikimedia.org/wikipedia/commons/4/49/Netgear_logo.svg"),
    ("canon", "https://upload.wikimedia.org/wikipedia/commons/4/42/Canon_logo.svg"),
    ("epson", "https://upload.wikimedia.org/wikipedia/commons/3/3c/Epson_logo_2015.svg"),
    ("brother", "https://upload.wikimedia.org/wikipedia/commons/5/5f/Brother_Industries_logo.svg"),
    ("ibm", "https://upload.wikimedia.org/wikipedia/commons/5/51/IBM_logo.svg"),
    ("sony", "https://upload.wikimedia.org/wikipedia/commons/c/ca/Sony_logo.svg"),
    ("panasonic", "https://upload.wikimedia.org/wikipedia/commons/3/35/Panasonic_logo_2011.svg"),
    ("philips", "https://upload.wikimedia.org/wikipedia/commons/3/33/Philips_New_Logo.svg"),
    ("jabra", "https://upload.wikimedia.org/wikipedia/commons/6/6a/Jabra_logo.svg"),
    ("plantronics", "https://upload.wikimedia.org/wikipedia/commons/9/9c/Plantronics_logo.svg"),
    ("poly", "https://upload.wikimedia.org/wikipedia/commons/9/9c/Plantronics_logo.svg"),
    ("aruba", "https://upload.wikimedia.org/wikipedia/commons/0/0e/Aruba_logo.svg"),
    ("fortinet", "https://upload.wikimedia.org/wikipedia/commons/9/95/Fortinet_logo.svg"),
    ("vmware", "https://upload.wikimedia.org/wikipedia/commons/5/5a/Vmware_logo.svg"),
    ("adobe", "https://upload.wikimedia.org/wikipedia/commons/6/6b/Adobe_Corporate_logo.svg"),
    ("autodesk", "https://upload.wikimedia.org/wikipedia/commons/5/59/Autodesk_Logo_2023.svg"),
    ("symantec", "https://upload.wikimedia.org/wikipedia/commons/d/d2/Symantec_logo10.png"),
    ("trend micro", "https://upload.wikimedia.org/wikipedia/commons/3/3e/Trend_Micro_logo.svg"),
    ("kaspersky", "https://upload.wikimedia.org/wikipedia/commons/a/a6/Kaspersky_Lab_logo.svg"),
    ("mcafee", "https://upload.wikimedia.org/wikipedia/commons/2/2e/McAfee_logo.svg"),
    ("sophos", "https://upload.wikimedia.org/wikipedia/commons/7/79/Sophos_logo.svg"),
    ("citrix", "https://upload.wikimedia.org/wikipedia/commons/8/86/Citrix_Systems_Logo_2021.svg"),
    ("manhattan", "https://www.manhattan-products.com/wp-content/themes/manhattan/img/logo.svg"),
];

/// Placeholder background per upper-cased brand.
pub const BRAND_COLORS: &[(&str, &str)] = &[
    ("HP", COLOR_DARK),
    ("DELL", COLOR_DARK),
    ("CISCO", COLOR_DARK),
    ("APPLE", COLOR_DARK),
    ("LENOVO", COLOR_ACCENT),
    ("MICROSOFT", COLOR_DARK),
    ("INTEL", COLOR_DARK),
    ("AMD", COLOR_ACCENT),
    ("JABRA", COLOR_DARK),
];

pub const COLOR_DARK: &str = "1C2A2F";
pub const COLOR_ACCENT: &str = "F15A29";
pub const COLOR_NEUTRAL: &str = "6C757D";

pub fn category_image(text: &str) -> Option<&'static str> {
    let haystack = text.to_lowercase();
    CATEGORY_IMAGES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(_, url)| *url)
}

/// Exact key match first, then containment in either direction.
pub fn brand_logo(brand: &str) -> Option<&'static str> {
    let b = brand.trim().to_lowercase();
    if b.is_empty() {
        return None;
    }
    BRAND_LOGOS
        .iter()
        .find(|(key, _)| *key == b)
        .or_else(|| {
            BRAND_LOGOS
                .iter()
                .find(|(key, _)| b.contains(key) || key.contains(b.as_str()))
        })
        .map(|(_, url)| *url)
}

pub fn brand_color(brand: &str) -> &'static str {
    let upper = brand.trim().to_uppercase();
    BRAND_COLORS
        .iter()
        .find(|(key, _)| *key == upper)
        .map(|(_, color)| *color)
        .unwrap_or(COLOR_NEUTRAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_category_wins() {
        // "gaming laptop" hits both sets; laptops come first.
        let url = category_image("Gaming Laptop 15in").expect("match");
        assert!(url.contains("1496181133206"));
        assert!(category_image("Audifonos JABRA headset").is_some());
        assert_eq!(category_image("zzz qqq"), None);
    }

    #[test]
    fn logos_match_exact_then_partial() {
        assert_eq!(brand_logo("HP"), Some(BRAND_LOGOS[0].1));
        assert_eq!(
            brand_logo("Western Digital Corp"),
            Some("https://upload.wikimedia.org/wikipedia/commons/2/2f/Western_Digital_logo.svg")
        );
        assert_eq!(brand_logo(""), None);
        assert_eq!(brand_logo("Zyxxq"), None);
    }

    #[test]
    fn brand_colors_default_to_neutral() {
        assert_eq!(brand_color("lenovo"), COLOR_ACCENT);
        assert_eq!(brand_color("Dell"), COLOR_DARK);
        assert_eq!(brand_color("Acteck"), COLOR_NEUTRAL);
    }
}
