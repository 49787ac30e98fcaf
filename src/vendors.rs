//! Brands offered in the storefront's vendor filter.

use itertools::Itertools;

/// Filter value meaning "no vendor filter".
pub const ALL_BRANDS: &str = "Todas las marcas";

const LOCAL_VENDORS: &[&str] = &[
    "HP Cómputo", "Dell", "Lenovo", "Cisco", "Apple", "Microsoft", "Adata", "Getttech", "Acteck",
    "Hpe Accs", "Yeyian", "Samsung", "LG", "ASUS", "Acer", "Vorago", "Cnp T5 Enterprise", "NACEB",
    "Cecotec", "Barco", "Vorago Accs", "Sansui", "Intel", "AMD", "Meraki", "Logitech", "Kingston",
    "Seagate", "Manhattan", "Kensington", "Toshiba (Pp)", "CyberPower", "Elo Touch", "TP-Link",
    "Zebra Tech.", "Jabra", "Poly", "LG Digital Signage", "Compulocks", "APC", "Balam Rush",
    "InFocus", "Canon", "Epson", "Brother", "StarTech.com", "HP POLY", "Honeywell", "Qian",
    "Intellinet", "BRobotix", "Eaton Consig Cables", "Xerox", "Perfect Choice", "Buffalo",
    "Hisense", "Dell NPOS", "HP Impresión", "Xzeal Gaming", "CDP", "Zebra Printers", "Targus",
    "Avision", "HPE ARUBA NETWORKING", "Cnp Meraki", "Zebra", "Vica", "Eaton", "Smartbitt", "BenQ",
    "Lenovo Idea Nb", "Hewlett Packard Enterprise", "Lenovo DCG", "Eaton Proyectos",
    "Eaton Consig Kvm", "Epson Hw", "Lexmark", "Axis", "TechZone", "Bixolon", "IBM", "Screenbeam",
    "Tecnosinergia", "TechZone DC POS", "Uniarch By Unv", "Lenovo Global", "Impresoras Zebra",
    "Surface", "Vertiv", "TMCELL", "Zebra Lectores", "Star Micronics", "Peerless",
    "Infinix Mobility", "Pdp", "Zebra Adc A5, A6", "Corsair (Arroba)", "QNAP", "Chicago Digital",
    "Viewsonic", "KINGSTON PP FLASH", "Hp Componentes", "Silimex", "XPG", "Dell Memory", "Kvr Ar",
    "3M", "Dataproducts", "Hid Global", "Msi Componentes", "Cooler Master (A)",
    "Msi Componentes (A)", "Corsair", "Lacie", "Unitech America", "Ezviz", "Ingressio", "Sharp",
];

/// Static vendor list, sorted.
pub fn local_vendors() -> Vec<&'static str> {
    LOCAL_VENDORS.iter().copied().sorted().collect()
}

/// Whether a vendor filter value means "every brand".
pub fn is_all_brands(vendor: &str) -> bool {
    let v = vendor.trim();
    v.is_empty() || v.eq_ignore_ascii_case(ALL_BRANDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_is_sorted_and_complete() {
        let vendors = local_vendors();
        assert_eq!(vendors.len(), LOCAL_VENDORS.len());
        assert!(vendors.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(vendors[0], "3M");
        assert!(vendors.contains(&"Perfect Choice"));
    }

    #[test]
    fn sentinel_values_mean_no_filter() {
        assert!(is_all_brands(""));
        assert!(is_all_brands("  "));
        assert!(is_all_brands("Todas las marcas"));
        assert!(!is_all_brands("Acteck"));
    }
}
