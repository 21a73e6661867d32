//! Статические данные каталога категорий.

/// Категория → подкатегории → под-подкатегории
pub(super) type TreeData = &'static [(&'static str, &'static [(&'static str, &'static [&'static str])])];

pub(super) const TREE: TreeData = &[
    (
        "fashion",
        &[
            ("women_clothing", &["dresses", "blouses", "skirts", "outerwear"]),
            ("men_clothing", &["shirts", "trousers", "outerwear", "suits"]),
            ("shoes", &["sneakers", "boots", "sandals"]),
            ("accessories", &["bags", "watches", "jewelry", "sunglasses"]),
        ],
    ),
    (
        "electronics",
        &[
            ("phones", &["smartphones", "cases", "chargers"]),
            ("computers", &["laptops", "monitors", "peripherals"]),
            ("audio", &["headphones", "speakers"]),
            ("home_appliances", &["kitchen_appliances", "vacuum_cleaners", "climate"]),
        ],
    ),
    (
        "home_living",
        &[
            ("textiles", &["bedding", "towels", "carpets", "curtains"]),
            ("kitchen", &["cookware", "tableware", "storage"]),
            ("decor", &["lighting", "frames", "candles"]),
            ("furniture", &["living_room", "bedroom", "garden"]),
        ],
    ),
    (
        "beauty",
        &[
            ("skin_care", &["face_care", "body_care", "sun_care"]),
            ("makeup", &["face_makeup", "eye_makeup", "lip_makeup"]),
            ("fragrance", &["women_fragrance", "men_fragrance"]),
            ("hair_care", &["shampoo", "hair_styling"]),
        ],
    ),
    (
        "mother_baby",
        &[
            ("baby_care", &["diapers", "wet_wipes", "baby_bath"]),
            ("toys", &["educational_toys", "plush_toys", "outdoor_toys"]),
            ("baby_clothing", &["bodysuits", "baby_sets"]),
        ],
    ),
    (
        "sports_outdoor",
        &[
            ("fitness", &["dumbbells", "yoga_mats", "sportswear"]),
            ("camping", &["tents", "sleeping_bags", "camping_kitchen"]),
            ("cycling", &["bicycles", "cycling_accessories"]),
        ],
    ),
    (
        "books_hobby",
        &[
            ("books", &["fiction", "non_fiction", "children_books"]),
            ("stationery", &["notebooks", "pens"]),
            ("crafts", &["knitting", "painting"]),
        ],
    ),
    (
        "supermarket",
        &[
            ("food", &["coffee_tea", "snacks", "breakfast"]),
            ("cleaning", &["laundry", "dishwashing", "surface_cleaners"]),
            ("personal_care", &["oral_care", "deodorants"]),
        ],
    ),
];

/// Поисковое слово → категория
pub(super) const KEYWORDS: &[(&str, &str)] = &[
    ("elbise", "fashion"),
    ("dress", "fashion"),
    ("платье", "fashion"),
    ("ayakkabı", "fashion"),
    ("shoes", "fashion"),
    ("обувь", "fashion"),
    ("çanta", "fashion"),
    ("bag", "fashion"),
    ("telefon", "electronics"),
    ("phone", "electronics"),
    ("телефон", "electronics"),
    ("laptop", "electronics"),
    ("ноутбук", "electronics"),
    ("kulaklık", "electronics"),
    ("headphones", "electronics"),
    ("halı", "home_living"),
    ("kilim", "home_living"),
    ("carpet", "home_living"),
    ("ковёр", "home_living"),
    ("havlu", "home_living"),
    ("towel", "home_living"),
    ("nevresim", "home_living"),
    ("parfüm", "beauty"),
    ("perfume", "beauty"),
    ("духи", "beauty"),
    ("ruj", "beauty"),
    ("lipstick", "beauty"),
    ("bebek", "mother_baby"),
    ("baby", "mother_baby"),
    ("oyuncak", "mother_baby"),
    ("toy", "mother_baby"),
    ("игрушка", "mother_baby"),
    ("çadır", "sports_outdoor"),
    ("tent", "sports_outdoor"),
    ("bisiklet", "sports_outdoor"),
    ("bicycle", "sports_outdoor"),
    ("kitap", "books_hobby"),
    ("book", "books_hobby"),
    ("книга", "books_hobby"),
    ("kahve", "supermarket"),
    ("coffee", "supermarket"),
    ("кофе", "supermarket"),
    ("deterjan", "supermarket"),
];

/// (ключ, локаль, текст). Нет перевода, нет строки.
pub(super) const LABELS: &[(&str, &str, &str)] = &[
    // Категории
    ("fashion", "en", "Fashion"),
    ("fashion", "tr", "Moda"),
    ("fashion", "ru", "Одежда и обувь"),
    ("electronics", "en", "Electronics"),
    ("electronics", "tr", "Elektronik"),
    ("electronics", "ru", "Электроника"),
    ("home_living", "en", "Home & Living"),
    ("home_living", "tr", "Ev & Yaşam"),
    ("home_living", "ru", "Дом и интерьер"),
    ("beauty", "en", "Beauty"),
    ("beauty", "tr", "Kozmetik"),
    ("beauty", "ru", "Красота"),
    ("mother_baby", "en", "Mother & Baby"),
    ("mother_baby", "tr", "Anne & Çocuk"),
    ("mother_baby", "ru", "Мама и малыш"),
    ("sports_outdoor", "en", "Sports & Outdoor"),
    ("sports_outdoor", "tr", "Spor & Outdoor"),
    ("sports_outdoor", "ru", "Спорт и отдых"),
    ("books_hobby", "en", "Books & Hobby"),
    ("books_hobby", "tr", "Kitap & Hobi"),
    ("books_hobby", "ru", "Книги и хобби"),
    ("supermarket", "en", "Supermarket"),
    ("supermarket", "tr", "Süpermarket"),
    ("supermarket", "ru", "Супермаркет"),
    // Подкатегории
    ("women_clothing", "en", "Women's clothing"),
    ("women_clothing", "tr", "Kadın giyim"),
    ("women_clothing", "ru", "Женская одежда"),
    ("men_clothing", "en", "Men's clothing"),
    ("men_clothing", "tr", "Erkek giyim"),
    ("men_clothing", "ru", "Мужская одежда"),
    ("shoes", "en", "Shoes"),
    ("shoes", "tr", "Ayakkabı"),
    ("shoes", "ru", "Обувь"),
    ("accessories", "en", "Accessories"),
    ("accessories", "tr", "Aksesuar"),
    ("accessories", "ru", "Аксессуары"),
    ("phones", "en", "Phones"),
    ("phones", "tr", "Telefon"),
    ("phones", "ru", "Телефоны"),
    ("computers", "en", "Computers"),
    ("computers", "tr", "Bilgisayar"),
    ("computers", "ru", "Компьютеры"),
    ("audio", "en", "Audio"),
    ("audio", "tr", "Ses sistemleri"),
    ("home_appliances", "en", "Home appliances"),
    ("home_appliances", "tr", "Ev aletleri"),
    ("home_appliances", "ru", "Бытовая техника"),
    ("textiles", "en", "Home textiles"),
    ("textiles", "tr", "Ev tekstili"),
    ("textiles", "ru", "Текстиль"),
    ("kitchen", "en", "Kitchen"),
    ("kitchen", "tr", "Mutfak"),
    ("kitchen", "ru", "Кухня"),
    ("decor", "en", "Decor"),
    ("decor", "tr", "Dekorasyon"),
    ("furniture", "en", "Furniture"),
    ("furniture", "tr", "Mobilya"),
    ("furniture", "ru", "Мебель"),
    ("skin_care", "en", "Skin care"),
    ("skin_care", "tr", "Cilt bakımı"),
    ("makeup", "en", "Makeup"),
    ("makeup", "tr", "Makyaj"),
    ("fragrance", "en", "Fragrance"),
    ("fragrance", "tr", "Parfüm"),
    ("hair_care", "en", "Hair care"),
    ("hair_care", "tr", "Saç bakımı"),
    ("baby_care", "en", "Baby care"),
    ("baby_care", "tr", "Bebek bakım"),
    ("toys", "en", "Toys"),
    ("toys", "tr", "Oyuncak"),
    ("toys", "ru", "Игрушки"),
    ("baby_clothing", "en", "Baby clothing"),
    ("fitness", "en", "Fitness"),
    ("camping", "en", "Camping"),
    ("camping", "tr", "Kamp"),
    ("cycling", "en", "Cycling"),
    ("books", "en", "Books"),
    ("books", "tr", "Kitap"),
    ("books", "ru", "Книги"),
    ("stationery", "en", "Stationery"),
    ("stationery", "tr", "Kırtasiye"),
    ("crafts", "en", "Crafts"),
    ("food", "en", "Food"),
    ("food", "tr", "Gıda"),
    ("food", "ru", "Продукты"),
    ("cleaning", "en", "Cleaning"),
    ("cleaning", "tr", "Temizlik"),
    ("personal_care", "en", "Personal care"),
    // Под-подкатегории (частично)
    ("carpets", "en", "Carpets & rugs"),
    ("carpets", "tr", "Halı & Kilim"),
    ("carpets", "ru", "Ковры"),
    ("towels", "en", "Towels"),
    ("towels", "tr", "Havlu"),
    ("bedding", "en", "Bedding"),
    ("bedding", "tr", "Nevresim"),
    ("smartphones", "en", "Smartphones"),
    ("smartphones", "tr", "Akıllı telefon"),
    ("laptops", "en", "Laptops"),
    ("dresses", "en", "Dresses"),
    ("dresses", "tr", "Elbise"),
    ("dresses", "ru", "Платья"),
    ("coffee_tea", "en", "Coffee & tea"),
    ("coffee_tea", "tr", "Kahve & Çay"),
];
