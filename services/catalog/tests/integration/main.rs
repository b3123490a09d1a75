mod card_test;
mod collection_test;
mod helpers;
mod price_test;
mod profile_test;
mod router_test;
