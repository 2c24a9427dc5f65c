use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::shared::AppError;
use crate::user::models::{User, DEFAULT_RATING, ROLE_NPC};
use crate::user::repository::UserRepository;

pub const NPC_EMAIL_DOMAIN: &str = "treasuresoftitan.local";

/// Name pool indexed by letter, a through z.
const NAME_POOL: [[&str; 10]; 26] = [
    ["Alice", "Adam", "Aaron", "Abigail", "Andrew", "Adrian", "Alexandra", "Alex", "Anthony", "Amanda"],
    ["Bob", "Ben", "Brian", "Blake", "Brandon", "Bradley", "Bella", "Bailey", "Brianna", "Beth"],
    ["Charlie", "Chris", "Carl", "Cameron", "Caleb", "Chloe", "Claire", "Caroline", "Cynthia", "Cole"],
    ["David", "Daniel", "Derek", "Dylan", "Dean", "Diana", "Danielle", "Daisy", "Donna", "Drew"],
    ["Emma", "Emily", "Ethan", "Evan", "Eric", "Elizabeth", "Elena", "Ella", "Evelyn", "Eddie"],
    ["Frank", "Fred", "Felix", "Finn", "Faith", "Fiona", "Felicity", "Frances", "Fernando", "Floyd"],
    ["George", "Gary", "Grant", "Greg", "Grace", "Gabriella", "Gemma", "Gina", "Gabriel", "Gavin"],
    ["Henry", "Harry", "Howard", "Hunter", "Hannah", "Haley", "Harper", "Hope", "Helen", "Hugh"],
    ["Isaac", "Ian", "Ivan", "Isaiah", "Isabella", "Iris", "Ivy", "Irene", "Isla", "India"],
    ["Jack", "James", "John", "Jake", "Jordan", "Jessica", "Jennifer", "Julia", "Jasmine", "Jane"],
    ["Kevin", "Keith", "Kyle", "Ken", "Katherine", "Kelly", "Kate", "Kimberly", "Kara", "Kylie"],
    ["Luke", "Logan", "Leo", "Lewis", "Laura", "Lucy", "Lily", "Lauren", "Leah", "Linda"],
    ["Mike", "Matt", "Mark", "Max", "Mason", "Mary", "Maria", "Michelle", "Megan", "Madison"],
    ["Nathan", "Nick", "Noah", "Neil", "Nolan", "Natalie", "Nicole", "Nina", "Naomi", "Nancy"],
    ["Oliver", "Oscar", "Owen", "Omar", "Olivia", "Olive", "Odette", "Ophelia", "Octavia", "Orla"],
    ["Peter", "Paul", "Patrick", "Philip", "Parker", "Piper", "Paige", "Penelope", "Phoebe", "Pearl"],
    ["Quinn", "Quentin", "Quincy", "Queen", "Quinton", "Queenie", "Quiana", "Quilla", "Quest", "Quade"],
    ["Ryan", "Robert", "Richard", "Roger", "Ross", "Rachel", "Rebecca", "Riley", "Rose", "Ruby"],
    ["Sam", "Steve", "Scott", "Sean", "Simon", "Sarah", "Sophia", "Samantha", "Stella", "Sophie"],
    ["Tom", "Tim", "Tyler", "Travis", "Trevor", "Tara", "Taylor", "Tiffany", "Teresa", "Tina"],
    ["Ulysses", "Uriel", "Urban", "Umar", "Ulrich", "Uma", "Ursula", "Unity", "Unique", "Una"],
    ["Victor", "Vincent", "Vince", "Vernon", "Vaughn", "Victoria", "Violet", "Vanessa", "Vera", "Valerie"],
    ["William", "Walter", "Wayne", "Wesley", "Wade", "Wendy", "Willow", "Whitney", "Wanda", "Winnie"],
    ["Xavier", "Xander", "Xerxes", "Xavi", "Xylon", "Xena", "Ximena", "Xyla", "Xiomara", "Xandra"],
    ["Yusuf", "Yuri", "Yale", "Yosef", "York", "Yvonne", "Yara", "Yasmin", "Yolanda", "Yvette"],
    ["Zachary", "Zane", "Zack", "Zeke", "Zeus", "Zoe", "Zelda", "Zara", "Zuri", "Zinnia"],
];

/// Picks a name starting with `letter`, or a placeholder when the letter
/// falls outside a-z.
pub(crate) fn random_name_for_letter<R: Rng + ?Sized>(letter: char, rng: &mut R) -> String {
    let letter = letter.to_ascii_lowercase();
    if !letter.is_ascii_lowercase() {
        return format!("NPC_{}", letter.to_ascii_uppercase());
    }

    let index = (letter as u8 - b'a') as usize;
    NAME_POOL[index]
        .choose(rng)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("NPC_{}", letter.to_ascii_uppercase()))
}

/// Creates the A-Z roster of NPC users: one per letter, role NPC, named
/// from the letter's name pool. A failed create is logged and skipped so
/// one bad row does not abort the rest of the roster.
#[instrument(skip(users, rng))]
pub async fn seed_npc_users<R: Rng + ?Sized>(
    users: &dyn UserRepository,
    rng: &mut R,
) -> Result<Vec<User>, AppError> {
    let mut created = Vec::new();

    for letter in 'a'..='z' {
        let display_name = random_name_for_letter(letter, rng);
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: format!("npc-{letter}@{NPC_EMAIL_DOMAIN}"),
            first_name: Some(display_name.clone()),
            last_name: Some("Bot".to_string()),
            display_name: Some(display_name),
            role: ROLE_NPC,
            rating: DEFAULT_RATING,
            created_at: Some(now),
            updated_at: Some(now),
        };

        match users.create_user(&user).await {
            Ok(user) => {
                info!(
                    letter = %letter,
                    display_name = user.display_name.as_deref().unwrap_or(""),
                    "NPC user created"
                );
                created.push(user);
            }
            Err(error) => {
                warn!(letter = %letter, error = %error, "Failed to create NPC user");
            }
        }
    }

    info!(count = created.len(), "NPC seeding finished");
    Ok(created)
}
