//! The 66 books of the Protestant canon, keyed by USX book code

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Testament {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub testament: Testament,
}

macro_rules! books {
    ($($code:literal => $name:literal, $t:ident;)*) => {
        pub static BOOKS: &[BookInfo] = &[
            $(BookInfo { code: $code, name: $name, testament: Testament::$t },)*
        ];
    };
}

books! {
    "GEN" => "Genesis", Old;
    "EXO" => "Exodus", Old;
    "LEV" => "Leviticus", Old;
    "NUM" => "Numbers", Old;
    "DEU" => "Deuteronomy", Old;
    "JOS" => "Joshua", Old;
    "JDG" => "Judges", Old;
    "RUT" => "Ruth", Old;
    "1SA" => "1 Samuel", Old;
    "2SA" => "2 Samuel", Old;
    "1KI" => "1 Kings", Old;
    "2KI" => "2 Kings", Old;
    "1CH" => "1 Chronicles", Old;
    "2CH" => "2 Chronicles", Old;
    "EZR" => "Ezra", Old;
    "NEH" => "Nehemiah", Old;
    "EST" => "Esther", Old;
    "JOB" => "Job", Old;
    "PSA" => "Psalms", Old;
    "PRO" => "Proverbs", Old;
    "ECC" => "Ecclesiastes", Old;
    "SNG" => "Song of Songs", Old;
    "ISA" => "Isaiah", Old;
    "JER" => "Jeremiah", Old;
    "LAM" => "Lamentations", Old;
    "EZK" => "Ezekiel", Old;
    "DAN" => "Daniel", Old;
    "HOS" => "Hosea", Old;
    "JOL" => "Joel", Old;
    "AMO" => "Amos", Old;
    "OBA" => "Obadiah", Old;
    "JON" => "Jonah", Old;
    "MIC" => "Micah", Old;
    "NAM" => "Nahum", Old;
    "HAB" => "Habakkuk", Old;
    "ZEP" => "Zephaniah", Old;
    "HAG" => "Haggai", Old;
    "ZEC" => "Zechariah", Old;
    "MAL" => "Malachi", Old;
    "MAT" => "Matthew", New;
    "MRK" => "Mark", New;
    "LUK" => "Luke", New;
    "JHN" => "John", New;
    "ACT" => "Acts", New;
    "ROM" => "Romans", New;
    "1CO" => "1 Corinthians", New;
    "2CO" => "2 Corinthians", New;
    "GAL" => "Galatians", New;
    "EPH" => "Ephesians", New;
    "PHP" => "Philippians", New;
    "COL" => "Colossians", New;
    "1TH" => "1 Thessalonians", New;
    "2TH" => "2 Thessalonians", New;
    "1TI" => "1 Timothy", New;
    "2TI" => "2 Timothy", New;
    "TIT" => "Titus", New;
    "PHM" => "Philemon", New;
    "HEB" => "Hebrews", New;
    "JAS" => "James", New;
    "1PE" => "1 Peter", New;
    "2PE" => "2 Peter", New;
    "1JN" => "1 John", New;
    "2JN" => "2 John", New;
    "3JN" => "3 John", New;
    "JUD" => "Jude", New;
    "REV" => "Revelation", New;
}

/// Look up a book by its USX code, case insensitive.
pub fn book_by_code(code: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.code.eq_ignore_ascii_case(code.trim()))
}

/// Look up a book by code or English name, e.g. "jhn", "John", "1 john", "1john".
pub fn find_book(query: &str) -> Option<&'static BookInfo> {
    let query = query.trim();
    if let Some(book) = book_by_code(query) {
        return Some(book);
    }
    let squashed: String = query.split_whitespace().collect::<String>().to_lowercase();
    BOOKS.iter().find(|b| {
        b.name.split_whitespace().collect::<String>().to_lowercase() == squashed
    })
}

pub fn book_name(code: &str) -> Option<&'static str> {
    book_by_code(code).map(|b| b.name)
}
