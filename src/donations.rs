use indexmap::IndexMap;

/// npm username → donate page.
///
/// Whenever someone has a package owned by one of these authors in their
/// package tree, they are prompted to donate.
const AUTHORS: &[(&str, &str)] = &[
    ("andrewnez", "https://en.liberapay.com/andrew/"),
    ("bevacqua", "https://www.patreon.com/bevacqua"),
    ("feross", "https://www.patreon.com/feross"),
    ("getify", "https://www.patreon.com/getify"),
    ("hueniverse", "https://www.patreon.com/eranhammer"),
    ("hughsk", "https://hughsk.io/donate/"),
    ("kgryte", "https://www.patreon.com/athan"),
    ("limonte", "https://www.patreon.com/limonte"),
    ("mafintosh", "https://www.patreon.com/mafintosh"),
    ("marijn", "https://www.patreon.com/marijn"),
    ("mikeal", "https://www.patreon.com/mikeal"),
    ("mmckegg", "https://www.patreon.com/MattMcKegg"),
    ("moox", "https://liberapay.com/MoOx/"),
    ("mpj", "https://www.patreon.com/funfunfunction"),
    ("noffle", "https://en.liberapay.com/noffle/"),
    ("shama", "https://www.patreon.com/shama"),
    ("sindresorhus", "https://www.patreon.com/sindresorhus"),
    ("staltz", "https://en.liberapay.com/andrestaltz/"),
    ("thlorenz", "https://www.patreon.com/thlorenz"),
    ("yyx990803", "https://www.patreon.com/evanyou"),
    ("juliangruber", "https://www.patreon.com/juliangruber"),
];

/// npm package name → donate page for the team behind it.
const PACKAGES: &[(&str, &str)] = &[
    ("babel-core", "https://opencollective.com/babel"),
    ("bower", "https://opencollective.com/bower"),
    ("chai", "https://opencollective.com/chaijs"),
    ("cheerio", "https://opencollective.com/cheerio"),
    ("choo", "https://opencollective.com/choo"),
    ("gulp", "https://opencollective.com/gulpjs"),
    ("gulp-cli", "https://opencollective.com/gulpjs"),
    ("hoodie", "https://opencollective.com/hoodie"),
    ("koa", "https://opencollective.com/koajs"),
    ("material-ui", "https://opencollective.com/material-ui"),
    ("mocha", "https://opencollective.com/mochajs"),
    ("parcel", "https://opencollective.com/parcel"),
    ("phenomic", "https://opencollective.com/phenomic"),
    ("preact", "https://opencollective.com/preact"),
    ("pug", "https://opencollective.com/pug"),
    ("react-native-elements", "https://opencollective.com/react-native-elements"),
    ("redux-devtools-extension", "https://opencollective.com/redux-devtools-extension"),
    ("rollup", "https://opencollective.com/rollup"),
    ("socket.io", "https://opencollective.com/socketio"),
    ("styled-components", "https://opencollective.com/styled-components"),
    ("tachyons", "https://opencollective.com/tachyons"),
    ("vue", "https://opencollective.com/vuejs"),
    ("webpack", "https://opencollective.com/webpack"),
    ("yo", "https://opencollective.com/yeoman"),
    ("levelup", "https://opencollective.com/level"),
];

/// Who is seeking donations, by author and by package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationTable {
    pub authors: IndexMap<String, String>,
    pub packages: IndexMap<String, String>,
}

impl DonationTable {
    pub fn new(
        authors: impl IntoIterator<Item = (String, String)>,
        packages: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            authors: authors.into_iter().collect(),
            packages: packages.into_iter().collect(),
        }
    }

    /// Add entries on top of this table. Existing keys get the new URL.
    pub fn extend(
        &mut self,
        authors: impl IntoIterator<Item = (String, String)>,
        packages: impl IntoIterator<Item = (String, String)>,
    ) {
        self.authors.extend(authors);
        self.packages.extend(packages);
    }

    pub fn author_url(&self, author: &str) -> Option<&str> {
        self.authors.get(author).map(String::as_str)
    }

    pub fn package_url(&self, package: &str) -> Option<&str> {
        self.packages.get(package).map(String::as_str)
    }
}

impl Default for DonationTable {
    /// The curated table shipped with the binary.
    fn default() -> Self {
        let owned = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>()
        };
        Self::new(owned(AUTHORS), owned(PACKAGES))
    }
}
