//! Market codes used by the chart data, with display names and rough
//! centroids (longitude, latitude in degrees) for the cartogram.

pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
    pub lon: f64,
    pub lat: f64,
}

const fn region(code: &'static str, name: &'static str, lon: f64, lat: f64) -> Region {
    Region { code, name, lon, lat }
}

pub static REGIONS: &[Region] = &[
    region("ar", "Argentina", -64.0, -34.0),
    region("at", "Austria", 14.5, 47.5),
    region("au", "Australia", 134.0, -25.0),
    region("be", "Belgium", 4.5, 50.8),
    region("bo", "Bolivia", -64.7, -16.3),
    region("br", "Brazil", -51.9, -14.2),
    region("ca", "Canada", -106.3, 56.1),
    region("ch", "Switzerland", 8.2, 46.8),
    region("cl", "Chile", -71.5, -35.7),
    region("co", "Colombia", -74.3, 4.6),
    region("cr", "Costa Rica", -84.0, 9.7),
    region("cz", "Czech Republic", 15.5, 49.8),
    region("de", "Germany", 10.5, 51.2),
    region("dk", "Denmark", 9.5, 56.3),
    region("do", "Dominican Republic", -70.2, 18.7),
    region("ec", "Ecuador", -78.2, -1.8),
    region("ee", "Estonia", 25.0, 58.6),
    region("es", "Spain", -3.7, 40.5),
    region("fi", "Finland", 25.7, 61.9),
    region("fr", "France", 2.2, 46.2),
    region("gb", "United Kingdom", -3.4, 55.4),
    region("gr", "Greece", 21.8, 39.1),
    region("gt", "Guatemala", -90.2, 15.8),
    region("hk", "Hong Kong", 114.2, 22.3),
    region("hn", "Honduras", -86.2, 15.2),
    region("hu", "Hungary", 19.5, 47.2),
    region("id", "Indonesia", 113.9, -0.8),
    region("ie", "Ireland", -8.2, 53.4),
    region("in", "India", 78.9, 20.6),
    region("is", "Iceland", -19.0, 64.9),
    region("it", "Italy", 12.6, 41.9),
    region("jp", "Japan", 138.3, 36.2),
    region("kr", "South Korea", 127.8, 35.9),
    region("lt", "Lithuania", 23.9, 55.2),
    region("lu", "Luxembourg", 6.1, 49.8),
    region("lv", "Latvia", 24.6, 56.9),
    region("mx", "Mexico", -102.6, 23.6),
    region("my", "Malaysia", 101.98, 4.2),
    region("nl", "Netherlands", 5.3, 52.1),
    region("no", "Norway", 8.5, 60.5),
    region("nz", "New Zealand", 174.9, -40.9),
    region("pa", "Panama", -80.8, 8.5),
    region("pe", "Peru", -75.0, -9.2),
    region("ph", "Philippines", 121.8, 12.9),
    region("pl", "Poland", 19.1, 51.9),
    region("pt", "Portugal", -8.2, 39.4),
    region("py", "Paraguay", -58.4, -23.4),
    region("se", "Sweden", 18.6, 60.1),
    region("sg", "Singapore", 103.8, 1.35),
    region("sk", "Slovakia", 19.7, 48.7),
    region("sv", "El Salvador", -88.9, 13.8),
    region("tr", "Turkey", 35.2, 39.0),
    region("tw", "Taiwan", 121.0, 23.7),
    region("us", "United States", -95.7, 37.1),
    region("uy", "Uruguay", -55.8, -32.5),
];

/// Aggregate market; has no position on the map.
pub const GLOBAL: &str = "global";

pub fn lookup(code: &str) -> Option<&'static Region> {
    let code = code.to_ascii_lowercase();
    REGIONS.iter().find(|r| r.code == code)
}

/// Display name for a market code, falling back to the code itself.
pub fn region_name(code: &str) -> String {
    if code.eq_ignore_ascii_case(GLOBAL) {
        return "Global".to_string();
    }
    lookup(code)
        .map(|r| r.name.to_string())
        .unwrap_or_else(|| code.to_string())
}
