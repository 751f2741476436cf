
/// Markup pieces of a search result tile, each switchable on or off
#[derive(Clone, Copy)]
pub struct Tile {
    pub name: bool,
    pub price: bool,
    pub rating: bool,
    pub link: bool,
    pub image: bool,
}

impl Tile {
    pub fn complete() -> Self {
        Self {
            name: true,
            price: true,
            rating: true,
            link: true,
            image: true,
        }
    }

    /// Tile whose parts follow the bits of `mask` (bit 0 = name .. bit 4 = image)
    pub fn from_mask(mask: u8) -> Self {
        Self {
            name: mask & 1 != 0,
            price: mask & 2 != 0,
            rating: mask & 4 != 0,
            link: mask & 8 != 0,
            image: mask & 16 != 0,
        }
    }

    pub fn html(&self) -> String {
        let mut html = String::from("<div class=\"puis-card-container\">\n");
        if self.image {
            html.push_str(
                "  <span class=\"s-product-image\"><img class=\"s-image\" src=\"https://m.media-amazon.com/images/I/71phone.jpg\" alt=\"\"></span>\n",
            );
        }
        if self.link {
            html.push_str(
                "  <a class=\"a-link-normal s-no-outline\" href=\"/Galaxy-M14/dp/B0CX?ref=sr_1_1&amp;keywords=phone\">img</a>\n",
            );
        }
        if self.name {
            html.push_str("  <h2 class=\"a-size-medium\"><span>  Galaxy M14 5G (Blue, 128GB)  </span></h2>\n");
        }
        if self.rating {
            html.push_str(
                "  <div class=\"a-row a-size-small\"><span>4.1 out of 5 stars</span> <span>2,041</span></div>\n",
            );
        }
        if self.price {
            html.push_str(
                "  <div class=\"s-price\" data-csa-c-price-to-pay=\"12999\"><span class=\"a-price\">₹12,999</span></div>\n",
            );
        }
        html.push_str("</div>\n");
        html
    }
}
