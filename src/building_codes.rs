use std::collections::HashMap;

/// Returned for any building code not present in the directory.
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Lookup table from campus building abbreviations to street addresses.
///
/// Constructed once at startup and shared behind `web::Data`; the resolver
/// itself is a pure lookup, unknown codes resolve to [`UNKNOWN_ADDRESS`]
/// rather than erroring.
pub struct BuildingDirectory {
    codes: HashMap<&'static str, &'static str>,
}

impl BuildingDirectory {
    /// The known buildings of the UBC Vancouver campus.
    pub fn ubc_vancouver() -> BuildingDirectory {
        let codes = HashMap::from([
            ("ALRD", "1822 East Mall"),
            ("ANSO", "6303 North West Marine Drive"),
            ("AERL", "2202 Main Mall"),
            ("ACEN", "1871 West Mall"),
            ("AUDX", "1924 West Mall"),
            ("BINN", "6373 University Boulevard"),
            ("BIOL", "6270 University Boulevard"),
            ("BUCH", "1866 Main Mall"),
            ("BUTO", "1873 East Mall"),
            ("CCM", "4145 Wesbrook Mall"),
            ("CIRS", "2260 West Mall"),
            ("CHAN", "6265 Crescent Road"),
            ("GUNN", "2553 Wesbrook Mall"),
            ("CHBE", "2360 East Mall V6T 1Z3"),
            ("CHEM", "2036 Main Mall"),
            ("CEME", "6250 Applied Science Lane"),
            ("MINL", "2332 West Mall"),
            ("COPP", "2146 Health Sciences Mall"),
            ("DLAM", "2033 Main Mall V6T 1Z2"),
            ("DSOM", "6361 University Blvd"),
            ("KENN", "2136 West Mall"),
            ("EOS", "6339 Stores Road"),
            ("ESB", "2207 Main Mall"),
            ("ESC", "2335 Engineering Road"),
            ("FNH", "2205 East Mall"),
            ("FSC", "2424 Main Mall"),
            ("FORW", "6350 Stores Road"),
            ("LASR", "6333 Memorial Road"),
            ("FRWO", "6354 Crescent Road"),
            ("FRDM", "2177 Wesbrook Mall V6T 1Z3"),
            ("GEOG", "1984 West Mall"),
            ("CUNN", "2146 East Mall"),
            ("HEBB", "2045 East Mall"),
            ("HENN", "6224 Agricultural Road"),
            ("ANGU", "2053 Main Mall"),
            ("DMP", "6245 Agronomy Road V6T 1Z4"),
            ("IRSC", "1985 Learners' Walk"),
            ("ICCS", "2366 Main Mall"),
            ("IBLC", "1961 East Mall V6T 1Z1"),
            ("MCDN", "2199 West Mall"),
            ("SOWK", "2080 West Mall"),
            ("LAX", "2371 Main Mall"),
            ("LSK", "6356 Agricultural Road"),
            ("PARC", "6049 Nurseries Road"),
            ("LSC", "2350 Health Sciences Mall"),
            ("MCLD", "2356 Main Mall"),
            ("MCML", "2357 Main Mall"),
            ("MATH", "1984 Mathematics Road"),
            ("MATX", "1986 Mathematics Road"),
            ("MEDC", "2176 Health Sciences Mall"),
            ("MSL", "2185 East Mall"),
            ("MUSC", "6361 Memorial Road"),
            ("SCRF", "2125 Main Mall"),
            ("AUDI", "6344 Memorial Road"),
            ("IRC", "2194 Health Sciences Mall"),
            ("PHRM", "2405 Wesbrook Mall"),
            ("PONE", "2034 Lower Mall"),
            ("PONF", "2008 Lower Mall"),
            ("OSB2", "6108 Thunderbird Boulevard"),
            ("SRC", "6000 Student Union Blvd"),
            ("BRIM", "2355 East Mall"),
            ("UCEN", "6331 Crescent Road V6T 1Z1"),
            ("TFPB", "6358 University Blvd, V6T 1Z4"),
            ("YURT", "3465 Ross Drive"),
            ("KPAV", "2211 Wesbrook Mall"),
            ("MGYM", "6081 University Blvd"),
            ("EDC", "2345 East Mall"),
            ("WESB", "6174 University Boulevard"),
            ("WMAX", "1933 West Mall"),
            ("SWNG", "2175 West Mall V6T 1Z4"),
        ]);

        BuildingDirectory { codes }
    }

    pub fn resolve(&self, code: &str) -> &str {
        self.codes.get(code).copied().unwrap_or(UNKNOWN_ADDRESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_code() {
        let directory = BuildingDirectory::ubc_vancouver();
        assert_eq!(directory.resolve("ALRD"), "1822 East Mall");
        assert_eq!(directory.resolve("SWNG"), "2175 West Mall V6T 1Z4");
    }

    #[test]
    fn test_unknown_code_gets_sentinel() {
        let directory = BuildingDirectory::ubc_vancouver();
        assert_eq!(directory.resolve("NOPE"), UNKNOWN_ADDRESS);
        assert_eq!(directory.resolve(""), UNKNOWN_ADDRESS);
        // lookup is case sensitive, codes are stored uppercase
        assert_eq!(directory.resolve("alrd"), UNKNOWN_ADDRESS);
    }
}
